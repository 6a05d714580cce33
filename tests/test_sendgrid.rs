use bdo_recipe_watch::config::NotifyConfig;
use bdo_recipe_watch::notifiers::{Alert, Attachment, Notifier, SendGridNotifier};
use bdo_recipe_watch::WatchError;
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

fn config(endpoint: String) -> NotifyConfig {
    NotifyConfig {
        endpoint,
        api_key: Some("test-key".to_string()),
        from: Some("alerts@example.com".to_string()),
        to: Some("me@example.com".to_string()),
        subject: "Recipe Alert".to_string(),
    }
}

fn alert() -> Alert {
    Alert {
        subject: "Recipe Alert".to_string(),
        text: "Updated Cooking Recipes".to_string(),
        attachment: Attachment {
            filename: "cooking.json".to_string(),
            content_type: "application/json".to_string(),
            content: br#"[{"id":"1"}]"#.to_vec(),
        },
    }
}

#[tokio::test]
async fn test_sends_mail_request() {
    let mut server = mockito::Server::new_async().await;
    let mail = server
        .mock("POST", "/v3/mail/send")
        .match_header("authorization", "Bearer test-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "from": { "email": "alerts@example.com" },
            "subject": "Recipe Alert"
        })))
        .with_status(202)
        .expect(1)
        .create_async()
        .await;

    let notifier = SendGridNotifier::new(
        &config(format!("{}/v3/mail/send", server.url())),
        Duration::from_secs(5),
    )
    .unwrap();
    notifier.send(&alert()).await.unwrap();

    mail.assert_async().await;
}

#[tokio::test]
async fn test_rejected_mail_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mail = server
        .mock("POST", "/v3/mail/send")
        .with_status(401)
        .with_body(r#"{"errors":[{"message":"The provided authorization grant is invalid"}]}"#)
        .create_async()
        .await;

    let notifier = SendGridNotifier::new(
        &config(format!("{}/v3/mail/send", server.url())),
        Duration::from_secs(5),
    )
    .unwrap();
    let result = notifier.send(&alert()).await;

    assert!(matches!(result, Err(WatchError::NotificationError(_))));
}

#[tokio::test]
async fn test_slow_mail_api_times_out() {
    // Accepts the connection but never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let notifier = SendGridNotifier::new(
        &config(format!("http://{addr}/v3/mail/send")),
        Duration::from_millis(200),
    )
    .unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), notifier.send(&alert()))
        .await
        .expect("request should time out on its own");

    match result {
        Err(WatchError::FetchError(e)) => assert!(e.is_timeout()),
        other => panic!("expected a timeout, got {:?}", other),
    }
}
