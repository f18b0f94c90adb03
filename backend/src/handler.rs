use crate::game::{Game, Games, SessionError};
use crate::ws;
use common::{CoinFlip, GameConfig, Lifecycle};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use warp::{
    http::StatusCode,
    reply::{json, with_status},
    Rejection, Reply,
};

type Result<T> = std::result::Result<T, Rejection>;

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateGameResponse {
    game_id: String,
    config: GameConfig,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RegisterResponse {
    player_id: String,
    url: String,
}

pub const DISPLAY_NAME: &str = "Connect 4";
pub const DESCRIPTION: &str = "Drop colored tokens into a grid. You win when you manage to form \
    a horizontal, vertical or diagonal line of four tokens.";

#[derive(Serialize, Debug)]
pub struct ServerInfo {
    name: &'static str,
    version: &'static str,
    description: &'static str,
}

impl Default for ServerInfo {
    fn default() -> Self {
        ServerInfo {
            name: DISPLAY_NAME,
            version: env!("CARGO_PKG_VERSION"),
            description: DESCRIPTION,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    message: String,
}

pub async fn create_game_handler(config: GameConfig, games: Games) -> Result<impl Reply> {
    let config = config.clamped();
    let game_id = Uuid::new_v4().as_simple().to_string();
    games
        .write()
        .await
        .insert(game_id.clone(), Game::new(config, CoinFlip::default()));
    info!("created game {} with {:?}", game_id, config);
    Ok(with_status(
        json(&CreateGameResponse { game_id, config }),
        StatusCode::CREATED,
    ))
}

pub async fn register_handler(game_id: String, games: Games, base_url: String) -> Result<impl Reply> {
    let mut games_map = games.write().await;
    let game = games_map.get_mut(&game_id).ok_or_else(warp::reject::not_found)?;
    match game.register() {
        Ok(player_id) => {
            let url = format!("{}/ws/{}/{}", base_url, game_id, player_id);
            Ok(with_status(
                json(&RegisterResponse { player_id, url }),
                StatusCode::OK,
            )
            .into_response())
        }
        Err(err @ SessionError::Full(_)) => Ok(error_reply(err, StatusCode::CONFLICT)),
        Err(err) => Ok(error_reply(err, StatusCode::BAD_REQUEST)),
    }
}

pub async fn leave_handler(game_id: String, player_id: String, games: Games) -> Result<impl Reply> {
    let mut games_map = games.write().await;
    let game = games_map.get_mut(&game_id).ok_or_else(warp::reject::not_found)?;
    match game.leave(&player_id) {
        Ok(Lifecycle::Terminate) => {
            games_map.remove(&game_id);
            info!("removed game {}", game_id);
            Ok(StatusCode::OK.into_response())
        }
        Ok(Lifecycle::Continue) => Ok(StatusCode::OK.into_response()),
        Err(err) => Ok(error_reply(err, StatusCode::NOT_FOUND)),
    }
}

pub async fn ws_handler(
    game_id: String,
    player_id: String,
    ws: warp::ws::Ws,
    games: Games,
) -> Result<impl Reply> {
    let registered = games
        .read()
        .await
        .get(&game_id)
        .map_or(false, |game| game.is_registered(&player_id));
    if registered {
        Ok(ws.on_upgrade(move |socket| ws::client_connection(socket, game_id, player_id, games)))
    } else {
        Err(warp::reject::not_found())
    }
}

pub async fn health_handler() -> Result<impl Reply> {
    Ok(StatusCode::OK)
}

pub async fn info_handler() -> Result<impl Reply> {
    Ok(json(&ServerInfo::default()))
}

fn error_reply(err: SessionError, status: StatusCode) -> warp::reply::Response {
    with_status(
        json(&ErrorResponse {
            message: err.to_string(),
        }),
        status,
    )
    .into_response()
}
