//! UseCase: 受信イベントのルーティング
//!
//! Joined 状態の接続から届いたイベント 1 件を解析し、store を更新してから
//! ルームへブロードキャストする。store 操作は必ずブロードキャストより先に完了する。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - EventRouter::handle_text() / handle() メソッド
//! - 各イベント種別の store 操作とブロードキャスト内容
//!
//! ### なぜこのテストが必要か
//! - 所有者以外の編集・削除で store が変更されず、ブロードキャストも出ないこと
//! - 既読通知は更新件数に関係なく必ず 1 回ブロードキャストされること
//! - store 障害・不正イベントで接続が落ちないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：message / delete_message / edit_message / read_receipt / typing
//! - 異常系：権限なし、store 障害、不正な JSON、未知の type
//! - エッジケース：拒否ポリシー notify

use std::sync::Arc;

use crate::{
    domain::{MessageContent, MessageId, MessageRepository},
    infrastructure::{
        BroadcastDispatcher,
        dto::websocket::{DeniedAction, InboundEvent, OutboundEvent},
    },
};

use super::{
    error::EventError,
    policy::{Denial, DenialPolicy},
    session::ChatSession,
};

/// イベント 1 件の処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// ルームへブロードキャストした
    Broadcast {
        kind: &'static str,
        delivered: usize,
    },
    /// 所有者ではないため破棄した
    Denied(Denial),
    /// 未知の type のため無視した
    Ignored,
}

/// 受信イベントのルーター
pub struct EventRouter {
    /// Repository（データアクセス層の抽象化）
    messages: Arc<dyn MessageRepository>,
    dispatcher: BroadcastDispatcher,
    denial_policy: DenialPolicy,
}

impl EventRouter {
    /// 新しい EventRouter を作成
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        dispatcher: BroadcastDispatcher,
        denial_policy: DenialPolicy,
    ) -> Self {
        Self {
            messages,
            dispatcher,
            denial_policy,
        }
    }

    /// テキストフレームを解析して処理する
    pub async fn handle_text(
        &self,
        session: &ChatSession,
        text: &str,
    ) -> Result<RouteOutcome, EventError> {
        let event = serde_json::from_str::<InboundEvent>(text)
            .map_err(|e| EventError::Malformed(e.to_string()))?;
        self.handle(session, event).await
    }

    /// 解析済みイベントを処理する
    pub async fn handle(
        &self,
        session: &ChatSession,
        event: InboundEvent,
    ) -> Result<RouteOutcome, EventError> {
        match event {
            InboundEvent::Message { content } => {
                let content = MessageContent::new(content);
                let message = self
                    .messages
                    .create_message(session.user, session.peer, content)
                    .await?;
                Ok(self
                    .broadcast(session, OutboundEvent::from_message(&message))
                    .await)
            }
            InboundEvent::DeleteMessage { message_id } => {
                let matched = self
                    .messages
                    .delete_message_if_owner(MessageId::new(message_id), session.user)
                    .await?;
                if !matched {
                    return Ok(self.deny(session, DeniedAction::DeleteMessage, message_id));
                }
                Ok(self
                    .broadcast(session, OutboundEvent::MessageDeleted { message_id })
                    .await)
            }
            InboundEvent::EditMessage {
                message_id,
                content,
            } => {
                let content = MessageContent::new(content);
                let matched = self
                    .messages
                    .edit_message_if_owner(MessageId::new(message_id), session.user, content.clone())
                    .await?;
                if !matched {
                    return Ok(self.deny(session, DeniedAction::EditMessage, message_id));
                }
                Ok(self
                    .broadcast(
                        session,
                        OutboundEvent::MessageEdited {
                            message_id,
                            content: content.into_string(),
                        },
                    )
                    .await)
            }
            InboundEvent::ReadReceipt => {
                let flipped = self
                    .messages
                    .mark_read_from(session.peer, session.user)
                    .await?;
                tracing::debug!(
                    "User {} read {} message(s) from {}",
                    session.user,
                    flipped,
                    session.peer
                );
                Ok(self
                    .broadcast(
                        session,
                        OutboundEvent::ReadReceipt {
                            reader_id: session.user.value(),
                        },
                    )
                    .await)
            }
            InboundEvent::Typing { is_typing } => Ok(self
                .broadcast(
                    session,
                    OutboundEvent::Typing {
                        user_id: session.user.value(),
                        is_typing,
                    },
                )
                .await),
            InboundEvent::Unknown => {
                tracing::debug!("Ignoring unknown event type from user {}", session.user);
                Ok(RouteOutcome::Ignored)
            }
        }
    }

    async fn broadcast(&self, session: &ChatSession, event: OutboundEvent) -> RouteOutcome {
        let delivered = self.dispatcher.dispatch(&session.room, &event).await;
        RouteOutcome::Broadcast {
            kind: event.kind(),
            delivered,
        }
    }

    fn deny(&self, session: &ChatSession, action: DeniedAction, message_id: i64) -> RouteOutcome {
        let denial = Denial { action, message_id };
        self.denial_policy
            .apply(&self.dispatcher, session, denial);
        RouteOutcome::Denied(denial)
    }
}
