//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層と Infrastructure 層を操作します。

pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;
pub mod policy;
pub mod route_event;
pub mod session;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, EventError};
pub use policy::{Denial, DenialPolicy};
pub use route_event::{EventRouter, RouteOutcome};
pub use session::ChatSession;
