//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::RepositoryError;

/// 接続（Joined への遷移）の失敗
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// オンライン状態の更新に失敗
    #[error("failed to mark user online: {0}")]
    Store(#[from] RepositoryError),
}

/// 受信イベント 1 件の処理失敗
///
/// どの variant も接続を閉じる理由にはならない。ログに残してイベントを破棄する。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// JSON として不正、`type` が無い、または必須フィールドが欠けている
    #[error("malformed event: {0}")]
    Malformed(String),

    /// store 操作の失敗（相手ユーザーが存在しない等）
    #[error("store failure: {0}")]
    Store(#[from] RepositoryError),
}
