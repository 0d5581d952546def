//! メッセージ送信（通知）の実装

mod websocket;

pub use websocket::WebSocketMessagePusher;
