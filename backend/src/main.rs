use crate::game::{Eviction, Games};
use clap::Parser;
use hashbrown::HashMap;
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;
use warp::{
    http::{header, Method},
    Filter,
};

mod client;
mod game;
mod handler;
mod util;
mod ws;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Parser, Debug)]
#[command(
    name = "connect-four-server",
    version,
    about = handler::DESCRIPTION
)]
struct Args {
    /// The network port of the game server
    #[arg(short, long, env = "CG_PORT", default_value_t = 8080)]
    port: u16,
    /// Address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,
    /// Seconds without any activity before a game is deleted
    #[arg(
        long,
        env = "CG_INACTIVE_GAME_SECS",
        default_value_t = game::DELETE_INACTIVE_GAME_DELAY.as_secs()
    )]
    inactive_game_secs: u64,
    /// Seconds without an open socket before a player is kicked
    #[arg(
        long,
        env = "CG_INACTIVE_PLAYER_SECS",
        default_value_t = game::KICK_INACTIVE_PLAYER_DELAY.as_secs()
    )]
    inactive_player_secs: u64,
}

impl Args {
    fn eviction(&self) -> Eviction {
        Eviction {
            inactive_game: Duration::from_secs(self.inactive_game_secs),
            inactive_player: Duration::from_secs(self.inactive_player_secs),
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let file_appender = tracing_appender::rolling::daily("./logs", "server.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(non_blocking)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("failed to install the log subscriber");

    let games: Games = Arc::new(RwLock::new(HashMap::new()));
    let addr = SocketAddr::new(args.host, args.port);
    let base_url = format!("ws://{}", addr);
    info!("created games map, serving on {}", addr);

    let eviction = args.eviction();
    let sweeper = games.clone();
    tokio::task::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            game::sweep_games(&sweeper, &eviction).await;
        }
    });

    let health_route = warp::path!("health").and_then(handler::health_handler);
    let info_route = warp::path!("info").and(warp::get()).and_then(handler::info_handler);

    let create_route = warp::path!("games")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_games(games.clone()))
        .and_then(handler::create_game_handler);

    let players = warp::path!("games" / String / "players");
    let register_route = players
        .and(warp::post())
        .and(with_games(games.clone()))
        .and(with_base_url(base_url))
        .and_then(handler::register_handler);

    let leave_route = warp::path!("games" / String / "players" / String)
        .and(warp::delete())
        .and(with_games(games.clone()))
        .and_then(handler::leave_handler);

    let ws_route = warp::path!("ws" / String / String)
        .and(warp::ws())
        .and(with_games(games.clone()))
        .and_then(handler::ws_handler);

    let routes = health_route
        .or(info_route)
        .or(create_route)
        .or(register_route)
        .or(leave_route)
        .or(ws_route)
        .with(
            warp::cors()
                .allow_methods(&[Method::OPTIONS, Method::GET, Method::POST, Method::DELETE])
                .allow_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
                .max_age(300)
                .allow_any_origin(),
        );

    warp::serve(routes).run(addr).await;
}

fn with_games(games: Games) -> impl Filter<Extract = (Games,), Error = Infallible> + Clone {
    warp::any().map(move || games.clone())
}

fn with_base_url(base_url: String) -> impl Filter<Extract = (String,), Error = Infallible> + Clone {
    warp::any().map(move || base_url.clone())
}
