//! 権限のない編集・削除の扱い
//!
//! 既定では何も返さずに破棄する。`Notify` にすると要求元の接続だけに
//! `denied` イベントを返す。イベントの契約（store 操作・ブロードキャスト）は変わらない。

use crate::infrastructure::{
    BroadcastDispatcher,
    dto::websocket::{DeniedAction, OutboundEvent},
};

use super::session::ChatSession;

/// 権限のない操作 1 件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denial {
    pub action: DeniedAction,
    pub message_id: i64,
}

/// 拒否時の通知ポリシー
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DenialPolicy {
    /// 何も通知しない
    #[default]
    Silent,
    /// 要求元の接続だけに `denied` を送る
    Notify,
}

impl DenialPolicy {
    /// ポリシーを適用する。要求元に通知した場合は true
    pub fn apply(
        &self,
        dispatcher: &BroadcastDispatcher,
        session: &ChatSession,
        denial: Denial,
    ) -> bool {
        tracing::warn!(
            "User {} is not the owner of message {} ({:?}); dropping",
            session.user,
            denial.message_id,
            denial.action
        );
        match self {
            Self::Silent => false,
            Self::Notify => dispatcher.send_to(
                &session.sender,
                &OutboundEvent::Denied {
                    action: denial.action,
                    message_id: denial.message_id,
                },
            ),
        }
    }
}
