use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use country_config::config::{ClickatellConfig, EmailConfig, InfobipConfig, NotificationConfig};
use country_config::notification::{
    notification_router, DeliveryMethod, EmailService, EmailTemplates, NotificationError,
    NotificationState, NotificationTemplates, SmsProvider, SmsService,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEMPLATES: &str = r#"{"data":[
    {"lang":"en","displayName":"English","messages":{
        "authenticationCodeNotification":"Your {{applicationName}} authentication code is: {{authCode}}",
        "birthRegistrationNotification":"The birth of {{name}} has been registered."}},
    {"lang":"fr","displayName":"Français","messages":{
        "authenticationCodeNotification":"Votre code d'authentification {{applicationName}} est : {{authCode}}",
        "birthRegistrationNotification":"La naissance de {{name}} a été enregistrée."}}
]}"#;

const EMAIL_TEMPLATES: &str = r#"{"templates":{
    "2-factor-authentication":{
        "subject":"Authentication code",
        "html":"<p>Your {{applicationName}} code is {{authCode}}</p>"}
}}"#;

fn notification_config(provider: &str, server: &MockServer) -> NotificationConfig {
    NotificationConfig {
        sms_provider: provider.to_string(),
        clickatell: ClickatellConfig {
            user: "crvs".to_string(),
            password: "secret".to_string(),
            api_id: "3456".to_string(),
            endpoint: format!("{}/http/sendmsg", server.uri()),
        },
        infobip: InfobipConfig {
            api_key: "infobip-key".to_string(),
            endpoint: format!("{}/sms/2/text/advanced", server.uri()),
            sender_id: "OpenCRVS".to_string(),
        },
        user_delivery_method: "sms".to_string(),
        email: email_config(server),
    }
}

fn email_config(server: &MockServer) -> EmailConfig {
    EmailConfig {
        api_key: "mail-key".to_string(),
        endpoint: format!("{}/v3/mail/send", server.uri()),
        sender: "noreply@opencrvs.org".to_string(),
    }
}

fn sms_service(provider: &str, server: &MockServer) -> SmsService {
    SmsService::new(reqwest::Client::new(), notification_config(provider, server))
}

fn notification_state(provider: &str, server: &MockServer) -> Arc<NotificationState> {
    delivering_users_by(DeliveryMethod::Sms, provider, server)
}

fn delivering_users_by(
    user_delivery: DeliveryMethod,
    provider: &str,
    server: &MockServer,
) -> Arc<NotificationState> {
    Arc::new(NotificationState {
        sms: sms_service(provider, server),
        email: EmailService::new(reqwest::Client::new(), email_config(server)),
        templates: NotificationTemplates::from_json(TEMPLATES).expect("templates parse"),
        email_templates: EmailTemplates::from_json(EMAIL_TEMPLATES).expect("email templates parse"),
        user_delivery,
    })
}

fn notify_request(payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/notification")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn unknown_provider_sends_nothing() {
    let server = MockServer::start().await;
    let service = sms_service("twilio", &server);

    let err = service
        .send_sms("+260911111111", "hello", false)
        .await
        .expect_err("unknown provider");

    assert!(matches!(err, NotificationError::UnknownProvider(ref name) if name == "twilio"));
    let requests = server.received_requests().await.expect("requests recorded");
    assert!(requests.is_empty());
}

#[tokio::test]
async fn infobip_posts_one_message_with_app_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms/2/text/advanced"))
        .and(header("authorization", "App infobip-key"))
        .and(body_json(json!({
            "messages": [{
                "destinations": [{ "to": "+260911111111" }],
                "from": "OpenCRVS",
                "text": "hello"
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "messages": [] })))
        .expect(1)
        .mount(&server)
        .await;

    sms_service("infobip", &server)
        .send_sms("+260911111111", "hello", false)
        .await
        .expect("infobip accepts");
}

#[tokio::test]
async fn infobip_error_status_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let err = sms_service("infobip", &server)
        .send_sms("+260911111111", "hello", false)
        .await
        .expect_err("infobip refuses");

    assert!(matches!(
        err,
        NotificationError::Rejected { provider: SmsProvider::Infobip, status: 401, .. }
    ));
}

#[tokio::test]
async fn clickatell_err_body_is_rejected_despite_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/http/sendmsg"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ERR: 001, Authentication failed"))
        .mount(&server)
        .await;

    let err = sms_service("clickatell", &server)
        .send_sms("+260911111111", "hello", false)
        .await
        .expect_err("clickatell refuses");

    assert!(matches!(
        err,
        NotificationError::Rejected { provider: SmsProvider::Clickatell, status: 200, .. }
    ));
}

#[tokio::test]
async fn clickatell_unicode_text_is_hex_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/http/sendmsg"))
        .and(query_param("user", "crvs"))
        .and(query_param("api_id", "3456"))
        .and(query_param("to", "+260911111111"))
        .and(query_param("unicode", "1"))
        .and(query_param("text", "00e9"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ID: 8d1f"))
        .expect(1)
        .mount(&server)
        .await;

    sms_service("clickatell", &server)
        .send_sms("+260911111111", "é", true)
        .await
        .expect("clickatell accepts");
}

#[tokio::test]
async fn notify_renders_template_in_requested_locale() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms/2/text/advanced"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let response = notification_router(notification_state("infobip", &server))
        .oneshot(notify_request(json!({
            "templateName": { "sms": "authenticationCodeNotification" },
            "recipient": { "sms": "+260911111111" },
            "locale": "fr",
            "variables": { "authCode": "123456" }
        })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let requests = server.received_requests().await.expect("requests recorded");
    let body: Value = requests[0].body_json().expect("json body");
    assert_eq!(
        body["messages"][0]["text"],
        "Votre code d'authentification Farajaland CRS est : 123456"
    );
}

#[tokio::test]
async fn notify_without_sms_recipient_is_a_bad_request() {
    let server = MockServer::start().await;

    let response = notification_router(notification_state("infobip", &server))
        .oneshot(notify_request(json!({
            "templateName": { "sms": "birthRegistrationNotification" },
            "recipient": { "email": "informant@example.com" },
            "locale": "en",
            "variables": { "name": "Leo Banda" }
        })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(server.received_requests().await.expect("recorded").is_empty());
}

#[tokio::test]
async fn provider_failure_maps_to_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let response = notification_router(notification_state("infobip", &server))
        .oneshot(notify_request(json!({
            "templateName": { "sms": "birthRegistrationNotification" },
            "recipient": { "sms": "+260911111111" },
            "locale": "en"
        })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn user_notification_goes_by_email_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .and(header("authorization", "Bearer mail-key"))
        .and(body_json(json!({
            "personalizations": [{ "to": [{ "email": "kennedy.mweene@opencrvs.org" }] }],
            "from": { "email": "noreply@opencrvs.org" },
            "subject": "Authentication code",
            "content": [{
                "type": "text/html",
                "value": "<p>Your Farajaland CRS code is 123456</p>"
            }]
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let response = notification_router(delivering_users_by(DeliveryMethod::Email, "infobip", &server))
        .oneshot(notify_request(json!({
            "templateName": {
                "sms": "authenticationCodeNotification",
                "email": "2-factor-authentication"
            },
            "recipient": { "sms": "+260911111111", "email": "kennedy.mweene@opencrvs.org" },
            "locale": "en",
            "variables": { "authCode": "123456" }
        })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let requests = server.received_requests().await.expect("requests recorded");
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn informant_notification_ignores_email_delivery() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms/2/text/advanced"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let response = notification_router(delivering_users_by(DeliveryMethod::Email, "infobip", &server))
        .oneshot(notify_request(json!({
            "templateName": { "sms": "birthRegistrationNotification" },
            "recipient": { "sms": "+260911111111", "email": "informant@opencrvs.org" },
            "locale": "en",
            "variables": { "name": "Leo Banda" }
        })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn example_addresses_are_not_mailed() {
    let server = MockServer::start().await;

    let response = notification_router(delivering_users_by(DeliveryMethod::Email, "infobip", &server))
        .oneshot(notify_request(json!({
            "templateName": {
                "sms": "authenticationCodeNotification",
                "email": "2-factor-authentication"
            },
            "recipient": { "email": "k.mweene@example.com" },
            "locale": "en",
            "variables": { "authCode": "123456" }
        })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(server.received_requests().await.expect("recorded").is_empty());
}

#[tokio::test]
async fn mail_api_failure_maps_to_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let err = delivering_users_by(DeliveryMethod::Email, "infobip", &server)
        .notify(
            serde_json::from_value(json!({
                "templateName": {
                    "sms": "authenticationCodeNotification",
                    "email": "2-factor-authentication"
                },
                "recipient": { "email": "kennedy.mweene@opencrvs.org" },
                "locale": "en"
            }))
            .expect("payload parses"),
        )
        .await
        .expect_err("mail API refuses");

    assert!(matches!(err, NotificationError::EmailRejected { status: 403, .. }));
    assert!(err.is_upstream());
}
