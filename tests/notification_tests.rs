mod test_utils;

use std::{net::TcpListener, sync::Mutex};

use actix_web::{web, App, HttpResponse, HttpServer};
use serde_json::{json, Value};
use test_utils::*;
use uuid::Uuid;

use chosn_backend::notifications::email::{EmailNotifier, Notification, Notifier, NotifyError};

#[derive(Default)]
struct Inbox {
    received: Mutex<Vec<Value>>,
}

async fn accept(inbox: web::Data<Inbox>, body: web::Json<Value>) -> HttpResponse {
    inbox.received.lock().unwrap().push(body.into_inner());
    HttpResponse::Accepted().finish()
}

async fn reject() -> HttpResponse {
    HttpResponse::ServiceUnavailable().finish()
}

async fn spawn_mail_service(inbox: web::Data<Inbox>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind mail service");
    let address = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(inbox.clone())
            .route("/send", web::post().to(accept))
            .route("/down", web::post().to(reject))
    })
    .listen(listener)
    .expect("Failed to start mail service")
    .workers(1)
    .run();

    tokio::spawn(server);
    address
}

fn welcome() -> Notification {
    Notification::Welcome {
        to: "ada@example.com".to_string(),
        name: "Ada Obi".to_string(),
        role: "developer".to_string(),
    }
}

#[test]
fn notifications_serialize_as_type_and_data() {
    let match_id = Uuid::new_v4();
    let value = serde_json::to_value(Notification::MatchInterest {
        to: "ada@example.com".to_string(),
        from_name: "Acme Pay".to_string(),
        match_id,
        position_title: "Rust Engineer".to_string(),
    })
    .unwrap();

    assert_eq!(
        value,
        json!({
            "type": "match-interest",
            "data": {
                "to": "ada@example.com",
                "from_name": "Acme Pay",
                "match_id": match_id,
                "position_title": "Rust Engineer"
            }
        })
    );
    assert_eq!(welcome().kind(), "welcome");
}

#[actix_rt::test]
async fn notifier_posts_the_envelope() {
    let inbox = web::Data::new(Inbox::default());
    let address = spawn_mail_service(inbox.clone()).await;

    let mut config = test_config();
    config.email_endpoint = Some(format!("{address}/send"));
    let notifier = EmailNotifier::new(&config);
    assert!(notifier.is_enabled());

    notifier.send(&welcome()).await.unwrap();

    let received = inbox.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["type"], "welcome");
    assert_eq!(received[0]["data"]["name"], "Ada Obi");
}

#[actix_rt::test]
async fn failed_delivery_reports_the_status() {
    let inbox = web::Data::new(Inbox::default());
    let address = spawn_mail_service(inbox).await;

    let mut config = test_config();
    config.email_endpoint = Some(format!("{address}/down"));
    let notifier = EmailNotifier::new(&config);

    let err = notifier.send(&welcome()).await.unwrap_err();

    assert!(matches!(err, NotifyError::HttpStatus(503)));
}

#[actix_rt::test]
async fn notifier_without_endpoint_is_a_no_op() {
    let mut config = test_config();
    config.email_endpoint = Some("   ".to_string());
    let notifier = EmailNotifier::new(&config);

    assert!(!notifier.is_enabled());
    assert!(notifier.send(&welcome()).await.is_ok());
}
