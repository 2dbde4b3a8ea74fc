#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::{net::SocketAddr, sync::Arc};

    use intervention_tool::{
        BoardConfig, BoardStore, IncidentBoard, JsonFileBoardStore, ResourceCatalog, http_api,
    };
    use tracing::info;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("intervention_tool=info")),
        )
        .init();

    let config = BoardConfig::from_env()?;
    let addr: SocketAddr = config.http_addr.parse()?;

    let mut board = IncidentBoard::with_config(ResourceCatalog::default(), config.clone());
    let store: Option<http_api::SharedBoardStore> = match &config.data_path {
        Some(path) => {
            let store = JsonFileBoardStore::new(path);
            if let Some(groups) = store.load_groups()? {
                board.replace_groups(groups);
            }
            info!(path = %path.display(), "board changes are saved to disk");
            Some(Arc::new(store) as http_api::SharedBoardStore)
        }
        None => None,
    };

    info!("intervention-tool HTTP API listening on http://{addr}");
    http_api::serve(addr, board, store).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
