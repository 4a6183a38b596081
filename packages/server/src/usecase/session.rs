//! 接続セッション
//!
//! 1 本の WebSocket 接続に対応する、認証済みユーザー・相手ユーザー・ルームの組。

use crate::{
    domain::{ConnectionId, RoomId, RoomIdFactory, UserId},
    infrastructure::MemberSender,
};

/// 接続セッション（Joined 状態で保持する情報）
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub connection: ConnectionId,
    pub user: UserId,
    pub peer: UserId,
    /// `user` と `peer` から導出した正規化済みルーム ID
    pub room: RoomId,
    /// この接続の送信チャンネル（Room Registry に登録される）
    pub sender: MemberSender,
}

impl ChatSession {
    /// 新しいセッションを作成し、ルーム ID を導出する
    pub fn new(user: UserId, peer: UserId, sender: MemberSender) -> Self {
        Self {
            connection: ConnectionId::generate(),
            user,
            peer,
            room: RoomIdFactory::for_pair(user, peer),
            sender,
        }
    }
}
