//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - Joined → Closed 遷移（ルームからの削除、オフライン化）
//!
//! ### なぜこのテストが必要か
//! - 切断後の接続にブロードキャストが送られ続けないこと
//! - store 障害があってもクリーンアップが最後まで実行されること
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルームからの削除とオフライン化
//! - エッジケース：Joined に到達しなかった接続の切断（冪等）
//! - 異常系：オフライン化の store 障害

use std::sync::Arc;

use crate::{domain::UserRepository, infrastructure::RoomRegistry};

use super::session::ChatSession;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    registry: Arc<RoomRegistry>,
    /// Repository（データアクセス層の抽象化）
    users: Arc<dyn UserRepository>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(registry: Arc<RoomRegistry>, users: Arc<dyn UserRepository>) -> Self {
        Self { registry, users }
    }

    /// 参加者切断を実行
    ///
    /// どちらの手順もベストエフォートで、失敗してもエラーを返さない。
    ///
    /// # Returns
    ///
    /// ルームから実際に削除された場合は true
    pub async fn execute(&self, session: &ChatSession) -> bool {
        // 1. Room Registry から削除
        let removed = self.registry.leave(&session.room, session.connection).await;

        // 2. オフライン化
        if let Err(e) = self.users.set_online(session.user, false).await {
            tracing::warn!("Failed to mark user {} offline: {}", session.user, e);
        }

        tracing::info!(
            "User {} left room '{}' (connection {})",
            session.user,
            session.room,
            session.connection
        );
        removed
    }
}
