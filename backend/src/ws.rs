use crate::client::Sender;
use crate::game::Games;
use common::Lifecycle;
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{error, info};
use uuid::Uuid;
use warp::ws::{Message, WebSocket};

pub async fn client_connection(ws: WebSocket, game_id: String, player_id: String, games: Games) {
    let (client_ws_sender, mut client_ws_rcv) = ws.split();
    let (client_sender, client_rcv) = mpsc::unbounded_channel();

    let client_rcv = UnboundedReceiverStream::new(client_rcv);
    tokio::task::spawn(client_rcv.forward(client_ws_sender).map(|result| {
        if let Err(e) = result {
            error!("error sending websocket msg: {}", e);
        }
    }));

    let socket_id = Uuid::new_v4().as_simple().to_string();
    {
        let mut games_map = games.write().await;
        let connected = match games_map.get_mut(&game_id) {
            Some(game) => game.connect(&player_id, socket_id.clone(), Sender(client_sender)),
            None => {
                error!("Game with ID {} did not match any existing games", game_id);
                return;
            }
        };
        if let Err(err) = connected {
            error!("Rejected socket for game {}: {}", game_id, err);
            return;
        }
    }

    info!("{} connected to game {}", player_id, game_id);

    while let Some(result) = client_ws_rcv.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                error!("error receiving ws message for id {}: {}", player_id, e);
                break;
            }
        };
        client_msg(&game_id, &player_id, msg, &games).await;
    }

    info!("{} disconnected from game {}", player_id, game_id);
    let mut games_map = games.write().await;
    let finished = match games_map.get_mut(&game_id) {
        Some(game) => game.disconnect(&player_id, &socket_id) == Lifecycle::Terminate,
        None => false,
    };
    if finished {
        games_map.remove(&game_id);
        info!("removed finished game {}", game_id);
    }
}

#[tracing::instrument(skip(games))]
async fn client_msg(game_id: &str, player_id: &str, msg: Message, games: &Games) {
    info!("received message from {}: {:?}", player_id, msg);
    let message = match msg.to_str() {
        Ok(v) => v.trim(),
        Err(_) => return,
    };

    if message == "ping" {
        return;
    }

    let mut games_map = games.write().await;
    match games_map.get_mut(game_id) {
        Some(game) => game.handle_message(player_id, message),
        None => error!("Game with ID {} did not match any existing games", game_id),
    }
}
