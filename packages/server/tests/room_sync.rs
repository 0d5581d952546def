//! End-to-end tests: the server runs in-process on an ephemeral port and is
//! driven over real WebSocket and HTTP connections.

use std::{net::SocketAddr, time::Duration};

use atelier_server::{bootstrap::build_server, config::ServerConfig};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
    task::JoinHandle,
    time::timeout,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Server running on a background task until dropped
struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<std::io::Result<()>>>,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let server = build_server(&ServerConfig::default());
        let handle = tokio::spawn(async move {
            server
                .serve(listener, async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        TestServer {
            addr,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    fn http(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn connect(&self) -> WsClient {
        let (stream, _) = connect_async(format!("ws://{}/ws", self.addr))
            .await
            .unwrap();
        WsClient { stream }
    }

    async fn create_room(&self, name: &str) -> String {
        let response = reqwest::Client::new()
            .post(self.http("/api/rooms"))
            .json(&json!({ "name": name }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        let body: Value = response.json().await.unwrap();
        body["id"].as_str().unwrap().to_string()
    }

    async fn room_status(&self, room_id: &str) -> reqwest::StatusCode {
        reqwest::get(self.http(&format!("/api/rooms/{room_id}")))
            .await
            .unwrap()
            .status()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    async fn send(&mut self, event: &str, data: Value) {
        let frame = json!({ "event": event, "data": data }).to_string();
        self.stream.send(Message::Text(frame.into())).await.unwrap();
    }

    async fn send_raw(&mut self, frame: &str) {
        self.stream
            .send(Message::Text(frame.to_string().into()))
            .await
            .unwrap();
    }

    /// Next JSON frame pushed by the server
    async fn recv(&mut self) -> Value {
        loop {
            let message = timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("socket closed")
                .unwrap();
            if let Message::Text(text) = message {
                return serde_json::from_str(text.as_str()).unwrap();
            }
        }
    }

    /// Skip frames until `event` arrives and return its payload
    async fn recv_event(&mut self, event: &str) -> Value {
        loop {
            let frame = self.recv().await;
            if frame["event"] == event {
                return frame.get("data").cloned().unwrap_or(Value::Null);
            }
        }
    }

    async fn identify(&mut self, user_id: &str, username: &str) {
        self.send("user-online", json!({ "userId": user_id, "username": username }))
            .await;
    }

    /// Join and wait until the join has been processed
    async fn join(&mut self, room_id: &str, user_id: &str) -> Value {
        self.send("join-room", json!({ "roomId": room_id, "userId": user_id }))
            .await;
        self.recv_event("canvas-sync").await
    }
}

fn draw(room_id: &str, n: f64) -> Value {
    json!({
        "roomId": room_id,
        "x": n,
        "y": n,
        "prevX": 0.0,
        "prevY": 0.0,
        "color": "#000000",
        "size": 2.0,
        "type": "brush",
    })
}

#[tokio::test]
async fn test_health_and_default_rooms() {
    // テスト項目: 起動時にデフォルトルームが作成され、ヘルスチェックが応答する
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let health: Value = reqwest::get(server.http("/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let rooms: Vec<Value> = reqwest::get(server.http("/api/rooms"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(health["status"], "ok");
    let ids: Vec<&str> = rooms.iter().filter_map(|r| r["id"].as_str()).collect();
    for n in 1..=5 {
        assert!(ids.contains(&format!("default_room_{n}").as_str()));
    }
}

#[tokio::test]
async fn test_create_room_and_lookup() {
    // テスト項目: 作成したルームは詳細 API で取得でき、存在しないルームは 404 になる
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let room_id = server.create_room("Sketch Night").await;
    let detail: Value = reqwest::get(server.http(&format!("/api/rooms/{room_id}")))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(detail["name"], "Sketch Night");
    assert_eq!(detail["activeConnections"], 0);
    assert_eq!(
        server.room_status("no-such-room").await,
        reqwest::StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_create_room_rejects_blank_name() {
    // テスト項目: 空のルーム名では作成できない
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let response = reqwest::Client::new()
        .post(server.http("/api/rooms"))
        .json(&json!({ "name": "   " }))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_late_joiner_receives_canvas_history() {
    // テスト項目: 後から参加した接続に描画履歴が順番通りに再生される
    // given (前提条件):
    let server = TestServer::start().await;
    let room_id = server.create_room("Replay").await;
    let mut alice = server.connect().await;
    alice.identify("alice", "Alice").await;
    alice.join(&room_id, "alice").await;
    alice.send("draw", draw(&room_id, 1.0)).await;
    alice.send("draw", draw(&room_id, 2.0)).await;
    // room-message is echoed to the sender, so both draws are processed
    alice
        .send(
            "room-message",
            json!({ "roomId": room_id, "username": "Alice", "message": "hi" }),
        )
        .await;
    alice.recv_event("room-message").await;

    // when (操作):
    let mut bob = server.connect().await;
    bob.identify("bob", "Bob").await;
    let history = bob.join(&room_id, "bob").await;

    // then (期待する結果):
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["x"], 1.0);
    assert_eq!(history[1]["x"], 2.0);

    let joined = alice.recv_event("player-joined").await;
    assert_eq!(joined["userId"], "bob");
    assert_eq!(joined["username"], "Bob");
}

#[tokio::test]
async fn test_draw_is_relayed_to_other_connections() {
    // テスト項目: 描画イベントが同じルームの他の接続に中継される
    // given (前提条件):
    let server = TestServer::start().await;
    let room_id = server.create_room("Relay").await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    alice.identify("alice", "Alice").await;
    bob.identify("bob", "Bob").await;
    alice.join(&room_id, "alice").await;
    bob.join(&room_id, "bob").await;

    // when (操作):
    alice.send("draw", draw(&room_id, 7.0)).await;

    // then (期待する結果):
    let op = bob.recv_event("draw").await;
    assert_eq!(op["x"], 7.0);
    assert_eq!(op["type"], "brush");
}

#[tokio::test]
async fn test_host_leaving_promotes_guest_and_last_leave_deletes_room() {
    // テスト項目: ホストが退出すると残りの参加者がホストになり、最後の退出でルームが削除される
    // given (前提条件):
    let server = TestServer::start().await;
    let room_id = server.create_room("Handover").await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    alice.identify("alice", "Alice").await;
    bob.identify("bob", "Bob").await;
    alice.join(&room_id, "alice").await;
    bob.join(&room_id, "bob").await;

    // when (操作):
    alice
        .send("leave-room", json!({ "roomId": room_id, "userId": "alice" }))
        .await;

    // then (期待する結果):
    let host = bob.recv_event("host-changed").await;
    assert_eq!(host["newHost"], "bob");
    let left = bob.recv_event("player-left").await;
    assert_eq!(left["userId"], "alice");

    // when (操作):
    bob.send("leave-room", json!({ "roomId": room_id, "userId": "bob" }))
        .await;

    // then (期待する結果):
    let mut status = server.room_status(&room_id).await;
    for _ in 0..50 {
        if status == reqwest::StatusCode::NOT_FOUND {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        status = server.room_status(&room_id).await;
    }
    assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_room_invite_reaches_only_the_invited_user() {
    // テスト項目: 招待は招待先ユーザーの接続にだけ届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    alice.identify("alice", "Alice").await;
    bob.identify("bob", "Bob").await;
    // joining the lobby confirms bob's identification has been processed
    bob.join("default", "bob").await;

    // when (操作):
    alice
        .send(
            "send-room-invite",
            json!({
                "fromUserId": "alice",
                "fromUsername": "Alice",
                "toUserId": "bob",
                "roomId": "default_room_1",
                "roomName": "Art Studio",
            }),
        )
        .await;

    // then (期待する結果):
    let invite = bob.recv_event("room-invite-received").await;
    assert_eq!(invite["fromUserId"], "alice");
    assert_eq!(invite["roomName"], "Art Studio");
}

#[tokio::test]
async fn test_malformed_frame_keeps_connection_open() {
    // テスト項目: 解釈できないフレームは無視され、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    // when (操作):
    client.send_raw("this is not json").await;
    client
        .send_raw(r#"{"event":"teleport","data":{}}"#)
        .await;
    let history = client.join("default_room_1", "carol").await;

    // then (期待する結果):
    assert_eq!(history, json!([]));
}
