//! End-to-end behavior of `SessionManager` against a mock console.

use alexa_api::cookie::CookieJar;
use alexa_api::session::{CredentialStore, Session};
use alexa_api::types::Device;
use alexa_api::{AlexaError, Config, DEFAULT_ACCOUNT, SessionManager};
use mockito::{Matcher, Mock, Server, ServerGuard};
use rstest::rstest;
use std::fs;
use std::net::TcpListener;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

const ACCOUNT: &str = "clbf7o1k20002ji087qiih1ah";
const TOKEN: &str = "Atnr|refresh-token";
const EXCHANGED_COOKIES: &str = "session-id=123-456; ubid-acbuk=258-000; at-acbuk=Atza|abc";

const EXCHANGE_BODY: &str = r#"{
  "response": {
    "tokens": {
      "cookies": {
        ".amazon.co.uk": [
          { "Name": "session-id", "Value": "\"123-456\"", "Path": "/", "Secure": true },
          { "Name": "ubid-acbuk", "Value": " 258-000 ", "Path": "/" },
          { "Name": "at-acbuk", "Value": "\"Atza|abc\" ", "Path": "/" }
        ]
      }
    }
  }
}"#;

struct Fixture {
    server: ServerGuard,
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            server: Server::new(),
            dir: TempDir::new().unwrap(),
        }
    }

    fn cookie_path(&self) -> PathBuf {
        self.dir.path().join("cookies.json")
    }

    fn config(&self) -> Config {
        Config::new()
            .with_base_url(&self.server.url())
            .with_cookie_path(self.cookie_path())
    }

    fn manager(&self) -> SessionManager {
        SessionManager::new(self.config()).unwrap()
    }

    /// Manager with `ACCOUNT` already logged in.
    fn logged_in(&self, csrf: &str) -> SessionManager {
        let mut session = Session::new(CookieJar::parse_header(EXCHANGED_COOKIES));
        session.csrf = Some(csrf.to_owned());
        let mut store = CredentialStore::new();
        store.insert(ACCOUNT, session);
        SessionManager::with_store(self.config(), self.cookie_path(), store).unwrap()
    }

    fn exchange(&mut self, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", "/ap/exchangetoken/cookies")
            .match_header("x-amzn-identity-auth-domain", "api.amazon.co.uk")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("app_name".into(), "Amazon Alexa".into()),
                Matcher::UrlEncoded("requested_token_type".into(), "auth_cookies".into()),
                Matcher::UrlEncoded("domain".into(), "www.amazon.co.uk".into()),
                Matcher::UrlEncoded("source_token_type".into(), "refresh_token".into()),
                Matcher::UrlEncoded("source_token".into(), TOKEN.into()),
            ]))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create()
    }

    fn probe(&mut self, path: &str, set_cookie: Option<&str>, hits: usize) -> Mock {
        let mut mock = self
            .server
            .mock("GET", path)
            .match_header("cookie", EXCHANGED_COOKIES)
            .match_header("dnt", "1")
            .with_status(200);
        if let Some(value) = set_cookie {
            mock = mock.with_header("set-cookie", value);
        }
        mock.expect(hits).create()
    }
}

const LANGUAGE: &str = "/api/language";
const DEVICE_PICK: &str = "/templates/oobe/d-device-pick.handlebars";
const DEVICE_LIST: &str = "/api/devices-v2/device?cached=false";

#[rstest]
#[case(200, true)]
#[case(401, false)]
#[case(403, false)]
#[case(500, false)]
#[case(302, false)]
fn check_status_is_true_only_for_200(#[case] status: usize, #[case] expected: bool) {
    let mut fx = Fixture::new();
    let mock = fx
        .server
        .mock("GET", "/api/bootstrap?version=0")
        .with_status(status)
        .create();

    assert_eq!(fx.manager().check_status(ACCOUNT).unwrap(), expected);
    mock.assert();
}

#[test]
fn check_status_sends_stored_cookie() {
    let mut fx = Fixture::new();
    fs::write(fx.cookie_path(), format!(r#"{{"{ACCOUNT}": "a=1; csrf=9"}}"#)).unwrap();
    let mock = fx
        .server
        .mock("GET", "/api/bootstrap?version=0")
        .match_header("cookie", "a=1; csrf=9")
        .match_header("user-agent", alexa_api::config::USER_AGENT)
        .with_status(200)
        .create();

    assert!(fx.manager().check_status(ACCOUNT).unwrap());
    mock.assert();
}

#[test]
fn check_status_timeout_is_an_error() {
    // Accepts connections into the backlog but never answers.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let dir = TempDir::new().unwrap();
    let config = Config::new()
        .with_base_url(&base)
        .with_cookie_path(dir.path().join("cookies.json"))
        .with_timeout(Some(Duration::from_millis(200)));

    let result = SessionManager::new(config).unwrap().check_status(ACCOUNT);
    assert!(matches!(result, Err(AlexaError::Http(_))));
}

#[test]
fn login_stops_at_first_csrf_probe_that_matches() {
    let mut fx = Fixture::new();
    let exchange = fx.exchange(200, EXCHANGE_BODY);
    let language = fx.probe(LANGUAGE, None, 1);
    let pick = fx.probe(DEVICE_PICK, Some("csrf=-8812; Path=/; Domain=.amazon.co.uk"), 1);
    let list = fx.probe(DEVICE_LIST, Some("csrf=other; Path=/"), 0);

    let mut manager = fx.manager();
    assert!(manager.login(ACCOUNT, TOKEN).unwrap());

    exchange.assert();
    language.assert();
    pick.assert();
    list.assert();

    let session = manager.session(ACCOUNT).unwrap();
    assert_eq!(session.csrf.as_deref(), Some("-8812"));
    assert_eq!(
        session.cookie_header(),
        format!("{EXCHANGED_COOKIES}; csrf=-8812")
    );
}

#[test]
fn login_persists_every_account() {
    let mut fx = Fixture::new();
    fs::write(fx.cookie_path(), r#"{"other": "x=1"}"#).unwrap();
    let _exchange = fx.exchange(200, EXCHANGE_BODY);
    let _language = fx.probe(LANGUAGE, Some("csrf=77; Path=/"), 1);

    let mut manager = fx.manager();
    assert!(manager.login(ACCOUNT, TOKEN).unwrap());

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(fx.cookie_path()).unwrap()).unwrap();
    assert_eq!(
        saved,
        serde_json::json!({
            "other": "x=1",
            ACCOUNT: format!("{EXCHANGED_COOKIES}; csrf=77"),
        })
    );

    let reloaded = CredentialStore::load(&fx.cookie_path()).unwrap();
    assert_eq!(reloaded.cookie_header(ACCOUNT), manager.store().cookie_header(ACCOUNT));
    assert_eq!(reloaded.cookie_header("other"), "x=1");
}

#[test]
fn rejected_exchange_changes_nothing() {
    let mut fx = Fixture::new();
    let exchange = fx.exchange(401, r#"{"response":{"error":{"code":"InvalidToken"}}}"#);
    let language = fx.probe(LANGUAGE, Some("csrf=1"), 0);

    let mut manager = fx.manager();
    assert!(!manager.login(ACCOUNT, TOKEN).unwrap());

    exchange.assert();
    language.assert();
    assert!(manager.session(ACCOUNT).is_none());
    assert_eq!(manager.store().csrf(ACCOUNT), "");
    assert!(!fx.cookie_path().exists());
}

#[test]
fn missing_csrf_keeps_exchanged_cookies_in_memory() {
    let mut fx = Fixture::new();
    let _exchange = fx.exchange(200, EXCHANGE_BODY);
    let probes = [
        fx.probe(LANGUAGE, None, 1),
        fx.probe(DEVICE_PICK, Some("session-token=abc; Path=/"), 1),
        fx.probe(DEVICE_LIST, None, 1),
    ];

    let mut manager = fx.manager();
    assert!(!manager.login(ACCOUNT, TOKEN).unwrap());

    for probe in &probes {
        probe.assert();
    }
    let session = manager.session(ACCOUNT).unwrap();
    assert_eq!(session.cookie_header(), EXCHANGED_COOKIES);
    assert_eq!(session.csrf, None);
    assert!(!fx.cookie_path().exists());
}

#[test]
fn exchange_without_storefront_cookies_is_an_error() {
    let mut fx = Fixture::new();
    let _exchange = fx.exchange(200, r#"{"response":{"tokens":{"cookies":{".amazon.com":[]}}}}"#);

    let result = fx.manager().login(ACCOUNT, TOKEN);
    assert!(matches!(
        result,
        Err(AlexaError::MissingCookies { domain }) if domain == ".amazon.co.uk"
    ));
}

#[test]
fn default_account_logs_in_under_default_id() {
    let mut fx = Fixture::new();
    let _exchange = fx.exchange(200, EXCHANGE_BODY);
    let _language = fx.probe(LANGUAGE, Some("csrf=5"), 1);

    let mut manager = fx.manager();
    let mut account = manager.default_account();
    assert_eq!(account.id(), DEFAULT_ACCOUNT);
    assert!(account.login(TOKEN).unwrap());
    assert_eq!(account.session().unwrap().csrf.as_deref(), Some("5"));
    assert_eq!(manager.accounts().collect::<Vec<_>>(), [DEFAULT_ACCOUNT]);
}

#[test]
fn devices_are_filtered_and_sorted() {
    let mut fx = Fixture::new();
    let mock = fx
        .server
        .mock("GET", DEVICE_LIST)
        .match_header("cookie", EXCHANGED_COOKIES)
        .match_header("csrf", "tok")
        .match_header("referer", Matcher::Regex("/spa/index.html$".into()))
        .with_status(200)
        .with_body(
            r#"{"devices": [
                {"accountName": "Zimmer", "deviceFamily": "ECHO", "deviceType": "T1", "serialNumber": "S1", "online": true},
                {"accountName": "This Phone", "deviceFamily": "VOX", "deviceType": "T2", "serialNumber": "S2"},
                {"accountName": "Éclair", "deviceFamily": "KNIGHT", "deviceType": "T3", "serialNumber": "S3"},
                {"accountName": "Everywhere", "deviceFamily": "WHA", "deviceType": "T4", "serialNumber": "S4"},
                {"accountName": "attic", "deviceFamily": "ROOK", "deviceType": "T5", "serialNumber": "S5"},
                {"accountName": "Sonos", "deviceFamily": null, "deviceType": "T6", "serialNumber": "S6"}
            ]}"#,
        )
        .create();

    let devices = fx.logged_in("tok").devices(ACCOUNT).unwrap();
    mock.assert();

    let names: Vec<&str> = devices.iter().map(|d| d.account_name.as_str()).collect();
    assert_eq!(names, ["attic", "Éclair", "Zimmer"]);
    assert_eq!(
        devices[1],
        Device {
            account_name: "Éclair".into(),
            device_type: "T3".into(),
            serial_number: "S3".into(),
            device_family: "KNIGHT".into(),
        }
    );
}

#[test]
fn devices_with_unexpected_body_is_an_error() {
    let mut fx = Fixture::new();
    let _mock = fx
        .server
        .mock("GET", DEVICE_LIST)
        .with_status(401)
        .with_body(r#"{"message": null}"#)
        .create();

    let result = fx.logged_in("tok").devices(ACCOUNT);
    assert!(matches!(result, Err(AlexaError::Json(_))));
}

#[test]
fn notifications_are_returned_as_is() {
    let mut fx = Fixture::new();
    let mock = fx
        .server
        .mock("GET", "/api/notifications")
        .match_header("csrf", "tok")
        .match_header("content-type", "application/json; charset=UTF-8")
        .with_status(200)
        .with_body(
            r#"{"notifications": [
                {"id": "n1", "type": "Alarm", "status": "ON", "alarmTime": 1671262200000,
                 "originalDate": "2022-12-17", "originalTime": "07:30:00.000",
                 "deviceSerialNumber": "S1", "alarmLabel": null, "remainingTime": 0},
                {"id": "n2", "type": "Timer", "status": "PAUSED", "timerLabel": "Pasta",
                 "remainingTime": 421000}
            ]}"#,
        )
        .create();

    let notifications = fx.logged_in("tok").notifications(ACCOUNT).unwrap();
    mock.assert();

    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[0].kind, "Alarm");
    assert_eq!(notifications[0].alarm_time, Some(1_671_262_200_000));
    assert_eq!(notifications[0].alarm_label, None);
    assert_eq!(notifications[1].timer_label.as_deref(), Some("Pasta"));
    assert_eq!(notifications[1].remaining_time, Some(421_000));
}

#[test]
fn queue_queries_the_device() {
    let mut fx = Fixture::new();
    let mock = fx
        .server
        .mock("GET", "/api/np/player?deviceSerialNumber=S1&deviceType=T1")
        .match_header("csrf", "tok")
        .with_status(200)
        .with_body(
            r#"{"playerInfo": {
                "state": "PLAYING",
                "infoText": {"title": "Song", "subText1": "Artist", "subText2": "Album"},
                "mainArt": {"url": "https://example.invalid/art.jpg"},
                "progress": {"mediaLength": 215, "mediaProgress": 42},
                "provider": {"providerName": "Amazon Music"}
            }}"#,
        )
        .create();

    let device = Device {
        account_name: "Kitchen".into(),
        device_type: "T1".into(),
        serial_number: "S1".into(),
        device_family: "ECHO".into(),
    };
    let queue = fx.logged_in("tok").queue(ACCOUNT, &device).unwrap();
    mock.assert();

    assert_eq!(queue.state.as_deref(), Some("PLAYING"));
    let info = queue.info_text.unwrap();
    assert_eq!(info.title.as_deref(), Some("Song"));
    assert_eq!(info.sub_text1.as_deref(), Some("Artist"));
    assert_eq!(queue.progress.unwrap().media_progress, Some(42));
    assert_eq!(
        queue.provider.unwrap().provider_name.as_deref(),
        Some("Amazon Music")
    );
}

#[test]
fn malformed_store_file_starts_empty() {
    let fx = Fixture::new();
    fs::write(fx.cookie_path(), "not json at all").unwrap();
    let manager = fx.manager();
    assert!(manager.store().is_empty());
    assert_eq!(manager.storage_path(), fx.cookie_path());
}

#[test]
fn devices_tolerate_null_fields_on_filtered_records() {
    let mut fx = Fixture::new();
    let _mock = fx
        .server
        .mock("GET", DEVICE_LIST)
        .with_status(200)
        .with_body(
            r#"{"devices": [
                {"accountName": "Kitchen", "deviceFamily": "ECHO", "deviceType": "T1", "serialNumber": "S1"},
                {"accountName": null, "deviceFamily": "THIRD_PARTY_AVS_MEDIA_DISPLAY", "deviceType": "T2", "serialNumber": null}
            ]}"#,
        )
        .create();

    let devices = fx.logged_in("tok").devices(ACCOUNT).unwrap();
    let names: Vec<&str> = devices.iter().map(|d| d.account_name.as_str()).collect();
    assert_eq!(names, ["Kitchen"]);
}
