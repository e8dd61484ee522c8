use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use rapidfire_core::manifest::GameDescriptor;
use rapidfire_server::build_app;
use rapidfire_server::config::ServerConfig;

fn scratch_games_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "rapidfire-server-{tag}-{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_game(root: &Path, name: &str, manifest: &str) {
    let dir = root.join(name);
    std::fs::create_dir_all(dir.join("assets")).unwrap();
    std::fs::write(dir.join("manifest.json"), manifest).unwrap();
}

async fn serve(games_root: &Path) -> SocketAddr {
    let config = ServerConfig {
        listen_addr: "127.0.0.1:0".to_string(),
        games_root: games_root.to_string_lossy().into_owned(),
    };
    let app = build_app(&config);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn api_games_lists_only_valid_manifests() {
    let root = scratch_games_dir("catalog");
    write_game(
        &root,
        "arrows",
        r#"{ "instruction": "Press the arrows!", "assets": ["ding.wav"] }"#,
    );
    write_game(&root, "dodge-block", r#"{ "author": "someone" }"#);
    write_game(&root, "broken", "{ not json");
    std::fs::create_dir_all(root.join("empty-dir")).unwrap();

    let addr = serve(&root).await;
    let games: Vec<GameDescriptor> = reqwest::get(format!("http://{addr}/api/games"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let mut names: Vec<&str> = games.iter().map(|g| g.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["arrows", "dodge-block"]);

    let arrows = games.iter().find(|g| g.name == "arrows").unwrap();
    assert_eq!(arrows.instruction.as_deref(), Some("Press the arrows!"));
    assert_eq!(arrows.assets.len(), 1);
}

#[tokio::test]
async fn game_assets_are_served_under_their_namespace() {
    let root = scratch_games_dir("assets");
    write_game(&root, "arrows", "{}");
    std::fs::write(root.join("arrows/assets/ding.wav"), b"RIFFdata").unwrap();

    let addr = serve(&root).await;
    let response = reqwest::get(format!("http://{addr}/games/arrows/assets/ding.wav"))
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"RIFFdata");

    let missing = reqwest::get(format!("http://{addr}/games/arrows/assets/absent.wav"))
        .await
        .unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_games_root_is_an_internal_error() {
    let root = scratch_games_dir("gone");
    std::fs::remove_dir_all(&root).unwrap();

    let addr = serve(&root).await;
    let response = reqwest::get(format!("http://{addr}/api/games"))
        .await
        .unwrap();
    assert_eq!(
        response.status(),
        reqwest::StatusCode::INTERNAL_SERVER_ERROR
    );
}
