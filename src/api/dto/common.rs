/*
 * Responsibility
 * - 書き込み系エンドポイント共通のレスポンス
 */
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub created: i32,
}

impl CreatedResponse {
    pub fn new(id: i32) -> Self {
        Self {
            success: true,
            created: id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    pub success: bool,
    pub updated: i32,
}

impl UpdatedResponse {
    pub fn new(id: i32) -> Self {
        Self {
            success: true,
            updated: id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub deleted: i32,
}

impl DeletedResponse {
    pub fn new(id: i32) -> Self {
        Self {
            success: true,
            deleted: id,
        }
    }
}
