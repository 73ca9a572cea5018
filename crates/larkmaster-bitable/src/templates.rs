// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in table templates.
//!
//! Registration order is significant: it is the keyword tie-break order.

use crate::catalog::TableTemplate;
use crate::field::{FieldDefinition, FieldType};

fn text(name: &str) -> FieldDefinition {
    FieldDefinition::new(name, FieldType::Text)
}

fn of(name: &str, field_type: FieldType) -> FieldDefinition {
    FieldDefinition::new(name, field_type)
}

fn select(name: &str, options: &[&str]) -> FieldDefinition {
    FieldDefinition::new(name, FieldType::Select).with_options(options.iter().copied())
}

pub(crate) fn builtin_templates() -> Vec<TableTemplate> {
    vec![
        TableTemplate::new("顧客管理", "顧客情報を管理するテーブル")
            .field(text("会社名").required())
            .field(text("担当者名"))
            .field(text("メールアドレス"))
            .field(of("電話番号", FieldType::Phone))
            .field(select("ステータス", &["リード", "商談中", "契約済み", "休眠"]))
            .field(select("優先度", &["高", "中", "低"]))
            .field(of("担当営業", FieldType::User))
            .field(of("次回アクション日", FieldType::Date))
            .field(text("備考"))
            .field(of("作成日", FieldType::CreatedTime))
            .keywords(["顧客", "クライアント", "お客様", "営業", "CRM"]),
        TableTemplate::new("プロジェクト管理", "プロジェクトとタスクを管理")
            .field(text("タスク名").required())
            .field(text("説明"))
            .field(select("ステータス", &["未着手", "進行中", "レビュー中", "完了", "保留"]))
            .field(select("優先度", &["緊急", "高", "中", "低"]))
            .field(of("担当者", FieldType::User))
            .field(of("開始日", FieldType::Date))
            .field(of("期限", FieldType::Date))
            .field(of("進捗率", FieldType::Number))
            .field(of("添付ファイル", FieldType::Attachment))
            .field(of("作成日", FieldType::CreatedTime))
            .keywords(["プロジェクト", "タスク", "進捗", "TODO"]),
        TableTemplate::new("在庫管理", "商品在庫を管理")
            .field(text("商品名").required())
            .field(text("SKU"))
            .field(select("カテゴリ", &["電子機器", "衣類", "食品", "日用品", "その他"]))
            .field(of("在庫数", FieldType::Number))
            .field(of("発注点", FieldType::Number))
            .field(of("単価", FieldType::Number))
            .field(text("仕入先"))
            .field(of("最終入荷日", FieldType::Date))
            .field(text("備考"))
            .keywords(["在庫", "商品", "倉庫"]),
        TableTemplate::new("売上管理", "売上データを管理")
            .field(of("取引日", FieldType::Date).required())
            .field(text("顧客名"))
            .field(text("商品/サービス"))
            .field(of("数量", FieldType::Number))
            .field(of("単価", FieldType::Number))
            .field(of("売上金額", FieldType::Number))
            .field(select("支払方法", &["現金", "クレジット", "銀行振込", "その他"]))
            .field(select("ステータス", &["未入金", "入金済み", "キャンセル"]))
            .field(of("担当者", FieldType::User))
            .keywords(["売上", "販売", "収益"]),
        TableTemplate::new("イベント管理", "イベントやセミナーを管理")
            .field(text("イベント名").required())
            .field(text("説明"))
            .field(of("開催日", FieldType::Date))
            .field(text("場所"))
            .field(of("定員", FieldType::Number))
            .field(of("参加者数", FieldType::Number))
            .field(select("ステータス", &["企画中", "募集中", "満席", "開催済み", "中止"]))
            .field(of("担当者", FieldType::User))
            .field(of("URL", FieldType::Url))
            .keywords(["イベント", "セミナー", "勉強会"]),
        TableTemplate::new("採用管理", "採用候補者を管理")
            .field(text("候補者名").required())
            .field(text("メールアドレス"))
            .field(of("電話番号", FieldType::Phone))
            .field(select("応募職種", &["エンジニア", "デザイナー", "営業", "マーケティング", "その他"]))
            .field(select(
                "選考ステータス",
                &["書類選考", "一次面接", "二次面接", "最終面接", "内定", "不採用", "辞退"],
            ))
            .field(of("面接日", FieldType::Date))
            .field(of("担当者", FieldType::User))
            .field(of("履歴書", FieldType::Attachment))
            .field(select("評価", &["A", "B", "C", "D"]))
            .field(text("メモ"))
            .keywords(["採用", "人事", "候補者", "面接"]),
        TableTemplate::new("問い合わせ管理", "カスタマーサポート問い合わせを管理")
            .field(of("問い合わせ番号", FieldType::AutoNumber))
            .field(text("タイトル").required())
            .field(text("内容"))
            .field(text("顧客名"))
            .field(text("メールアドレス"))
            .field(select("カテゴリ", &["製品", "サービス", "請求", "技術", "その他"]))
            .field(select("優先度", &["緊急", "高", "中", "低"]))
            .field(select("ステータス", &["新規", "対応中", "保留", "解決済み", "クローズ"]))
            .field(of("担当者", FieldType::User))
            .field(of("受付日", FieldType::CreatedTime))
            .keywords(["問い合わせ", "サポート", "チケット"]),
        TableTemplate::new("会議メモ", "会議の記録を管理")
            .field(text("会議タイトル").required())
            .field(of("開催日時", FieldType::Date))
            .field(of("参加者", FieldType::User))
            .field(text("議事内容"))
            .field(text("決定事項"))
            .field(text("次回アクション"))
            .field(of("添付ファイル", FieldType::Attachment))
            .field(of("作成者", FieldType::CreatedBy))
            .keywords(["会議", "ミーティング", "議事録"]),
    ]
}
