use teams_logger::{Severity, TeamsLogger};

// The logger is installed process wide, so everything that needs it lives in this one test.
#[test]
fn test_init_posts_from_log_macros() {
    let mut server = mockito::Server::new();
    let sync_mock = server
        .mock("POST", "/hook")
        .with_status(200)
        .match_body(mockito::Matcher::PartialJsonString(
            "{\"text\": \"ERROR: disk full\"}".to_string(),
        ))
        .expect(1)
        .create();
    let async_mock = server
        .mock("POST", "/hook")
        .with_status(200)
        .match_body(mockito::Matcher::PartialJsonString(
            "{\"text\": \"WARNING: queue backing up\"}".to_string(),
        ))
        .expect(1)
        .create();

    TeamsLogger::new(format!("{}/hook", server.url()))
        .with_name("")
        .with_severity_colour(false)
        .with_level(Severity::Warning)
        .init()
        .unwrap();
    assert_eq!(log::max_level(), log::LevelFilter::Warn);

    log::info!("below the threshold");
    log::error!("disk full");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(async {
        tokio::spawn(async { log::warn!("queue backing up") })
            .await
            .unwrap();
    });

    sync_mock.assert();
    async_mock.assert();
}
