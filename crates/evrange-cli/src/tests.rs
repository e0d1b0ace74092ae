use super::*;

fn test_config() -> AppConfig {
    AppConfig {
        ors_api_key: Some("key".to_owned()),
        google_api_key: None,
        ors_base_url: None,
        google_base_url: None,
        log_level: "info".to_owned(),
        request_timeout_secs: 30,
        user_agent: "evrange-test/0.1".to_owned(),
        max_concurrent_searches: 8,
        max_oracle_retries: 1,
        retry_backoff_base_ms: 250,
        deadline_secs: Some(60),
    }
}

#[test]
fn parses_required_flags_with_defaults() {
    let cli = Cli::try_parse_from(["evrange", "--lat", "52.52", "--lon", "13.405", "--range", "150"])
        .expect("expected valid cli args");

    assert!((cli.lat - 52.52).abs() < f64::EPSILON);
    assert!((cli.range_km - 150.0).abs() < f64::EPSILON);
    assert!((cli.buffer_km - 10.0).abs() < f64::EPSILON);
    assert_eq!(cli.directions, 16);
    assert!(!cli.use_google);
    assert!(!cli.json);
    assert_eq!(cli.output, PathBuf::from("ev_range_map.html"));
    assert_eq!(cli.backend(), Backend::OpenRouteService);
}

#[test]
fn accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "evrange", "--lat", "-33.87", "--lon", "-70.65", "--range", "300",
    ])
    .expect("expected valid cli args");
    assert!((cli.lat + 33.87).abs() < f64::EPSILON);
    assert!((cli.lon + 70.65).abs() < f64::EPSILON);
}

#[test]
fn missing_range_is_an_error() {
    let result = Cli::try_parse_from(["evrange", "--lat", "52.52", "--lon", "13.405"]);
    assert!(result.is_err());
}

#[test]
fn use_google_selects_google_backend() {
    let cli = Cli::try_parse_from([
        "evrange",
        "--lat",
        "37.77",
        "--lon",
        "-122.42",
        "--range",
        "250",
        "--use-google",
        "--directions",
        "8",
        "--output",
        "out/sf.html",
    ])
    .unwrap();
    assert_eq!(cli.backend(), Backend::Google);
    assert_eq!(cli.directions, 8);
    assert_eq!(cli.output, PathBuf::from("out/sf.html"));
}

#[test]
fn search_params_come_from_config_without_overrides() {
    let cli =
        Cli::try_parse_from(["evrange", "--lat", "1", "--lon", "2", "--range", "100"]).unwrap();
    let params = cli.search_params(&test_config());
    assert_eq!(params.max_iterations, SearchParams::default().max_iterations);
    assert_eq!(params.max_concurrent_searches, 8);
    assert_eq!(params.max_oracle_retries, 1);
    assert_eq!(params.deadline, Some(Duration::from_secs(60)));
}

#[test]
fn flags_override_search_params() {
    let cli = Cli::try_parse_from([
        "evrange",
        "--lat",
        "1",
        "--lon",
        "2",
        "--range",
        "100",
        "--max-iterations",
        "8",
        "--tolerance",
        "0.02",
        "--deadline-secs",
        "5",
        "--json",
    ])
    .unwrap();
    let params = cli.search_params(&test_config());
    assert_eq!(params.max_iterations, 8);
    assert!((params.tolerance_ratio - 0.02).abs() < f64::EPSILON);
    assert_eq!(params.deadline, Some(Duration::from_secs(5)));
    assert!(cli.json);
}
