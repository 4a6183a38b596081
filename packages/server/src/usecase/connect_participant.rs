//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - Connecting → Joined 遷移（ルーム登録、オンライン化）
//!
//! ### なぜこのテストが必要か
//! - 接続した両ユーザーが同じルームに登録されないとメッセージが相手に届かない
//! - オンライン状態の更新に失敗した場合の扱いを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルーム登録とオンライン化
//! - 異常系：store 障害（登録はされたまま、切断処理で回収する）
//! - エッジケース：同じユーザーの複数接続

use std::sync::Arc;

use crate::{domain::UserRepository, infrastructure::RoomRegistry};

use super::{error::ConnectError, session::ChatSession};

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    registry: Arc<RoomRegistry>,
    /// Repository（データアクセス層の抽象化）
    users: Arc<dyn UserRepository>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(registry: Arc<RoomRegistry>, users: Arc<dyn UserRepository>) -> Self {
        Self { registry, users }
    }

    /// 参加者接続を実行
    ///
    /// ルームへの登録を先に行い、その後オンライン状態を更新する。
    /// 失敗した場合でも呼び出し側は必ず DisconnectParticipantUseCase を実行すること。
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 接続成功（Joined）
    /// * `Err(ConnectError)` - オンライン状態の更新に失敗
    pub async fn execute(&self, session: &ChatSession) -> Result<(), ConnectError> {
        // 1. Room Registry に送信チャンネルを登録
        self.registry
            .join(&session.room, session.connection, session.sender.clone())
            .await;

        // 2. オンライン状態を更新
        self.users.set_online(session.user, true).await?;

        tracing::info!(
            "User {} joined room '{}' (connection {})",
            session.user,
            session.room,
            session.connection
        );
        Ok(())
    }
}
