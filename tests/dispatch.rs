//! End-to-end dispatch through `Application::dispatch`.

use actionkit::axum::body::{Body, to_bytes};
use actionkit::axum::http::{Request, Response, header};
use actionkit::prelude::*;
use actionkit::validation::{Rule, RuleValidator, Validator};
use actionkit::{ActionError, RouteResolutionError};
use serde_json::{Value, json};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

async fn read_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn read_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn counting_action(hits: &Arc<AtomicUsize>) -> Action {
    let hits = Arc::clone(hits);
    Action::from_fn(move |_request, response| {
        let hits = Arc::clone(&hits);
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            Ok(helpers::write(response, "reached", StatusCode::OK))
        }
    })
}

#[tokio::test]
async fn json_gate_rejects_without_reaching_handler() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Application::builder()
        .group(
            RouteGroup::new("/api")
                .middleware(JsonOnly::new())
                .post("/things", counting_action(&hits)),
        )
        .build()
        .unwrap();

    let plain = Request::builder()
        .method("POST")
        .uri("/api/things")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("hello"))
        .unwrap();
    let response = app.dispatch(plain).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(read_json(response).await["expected"], "application/json");

    let missing = Request::builder()
        .method("POST")
        .uri("/api/things")
        .body(Body::empty())
        .unwrap();
    assert!(app.dispatch(missing).await.status().is_client_error());
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    let response = app
        .dispatch(json_post("/api/things", json!({"a": 1})))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_text(response).await, "reached");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn json_gate_accepts_charset_and_suffix_types() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Application::builder()
        .group(
            RouteGroup::new("/api")
                .middleware(JsonOnly::new())
                .post("/things", counting_action(&hits)),
        )
        .build()
        .unwrap();

    for content_type in ["application/json; charset=utf-8", "application/vnd.api+json"] {
        let request = Request::builder()
            .method("POST")
            .uri("/api/things")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from("{}"))
            .unwrap();
        assert_eq!(app.dispatch(request).await.status(), StatusCode::OK);
    }
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[derive(Injectable)]
struct AccountController {
    router: Arc<dyn UrlGenerator>,
    validator: Arc<RuleValidator>,
}

impl ActionController for AccountController {
    fn router(&self) -> actionkit::Result<&dyn UrlGenerator> {
        Ok(self.router.as_ref())
    }

    fn validator(&self) -> actionkit::Result<&dyn Validator> {
        Ok(self.validator.as_ref())
    }
}

impl AccountController {
    async fn create(
        self: Arc<Self>,
        request: ActionRequest,
        response: ActionResponse,
    ) -> actionkit::Result<ActionResponse> {
        let input = self.params(&request, ["email"]);
        if !self
            .validator
            .validate(&input, [("email", &[Rule::Required, Rule::Email][..])])
        {
            return self.validation_errors(response);
        }
        self.created(response, "accounts.show", [("id", 42)])
    }

    async fn lost(
        self: Arc<Self>,
        _request: ActionRequest,
        response: ActionResponse,
    ) -> actionkit::Result<ActionResponse> {
        self.created(response, "accounts.missing", RouteParams::new())
    }
}

fn account_app() -> Application {
    let mut container = Container::new();
    container.register_factory(RuleValidator::new);

    Application::builder()
        .container(container)
        .group(
            RouteGroup::new("/accounts")
                .middleware(JsonOnly::new())
                .post("/", Action::bind(AccountController::create))
                .post("/lost", Action::bind(AccountController::lost)),
        )
        .group(RouteGroup::new("/accounts").route(
            Route::get("/{id}", Action::from_fn(|_q, r| async move { Ok(r) })).name("accounts.show"),
        ))
        .build()
        .unwrap()
}

#[tokio::test]
async fn created_returns_201_with_location() {
    let app = account_app();
    let response = app
        .dispatch(json_post("/accounts", json!({"email": "ada@example.com"})))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::LOCATION], "/accounts/42");
    assert_eq!(app.url_for("accounts.show", [("id", 42)]).unwrap(), "/accounts/42");
    assert!(read_text(response).await.is_empty());
}

#[tokio::test]
async fn validation_failure_is_400_and_not_shared_between_requests() {
    let app = account_app();

    let bad = app
        .dispatch(json_post("/accounts", json!({"email": "not-an-email"})))
        .await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(bad).await,
        json!({"email": ["email must be a valid email address"]})
    );

    let good = app
        .dispatch(json_post("/accounts", json!({"email": "ada@example.com"})))
        .await;
    assert_eq!(good.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn unknown_redirect_target_surfaces_as_500() {
    let app = account_app();
    let response = app.dispatch(json_post("/accounts/lost", json!({}))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["statusCode"], 500);
    assert!(body["message"].as_str().unwrap().contains("accounts.missing"));
}

#[test]
fn missing_service_fails_at_build() {
    // No RuleValidator registered.
    let result = Application::builder()
        .group(RouteGroup::new("/accounts").post("/", Action::bind(AccountController::create)))
        .build();

    match result {
        Err(ActionError::ServiceNotFound { name }) => assert!(name.contains("RuleValidator")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("build should fail"),
    }
}

#[test]
fn unknown_route_error_is_typed() {
    let app = account_app();
    let err = app.url_for("nope", RouteParams::new()).unwrap_err();
    assert!(matches!(
        err,
        ActionError::RouteResolution(RouteResolutionError::UnknownRoute(ref name)) if name == "nope"
    ));
}

struct Trace {
    label: &'static str,
    journal: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Middleware for Trace {
    async fn handle(&self, request: ActionRequest, next: Next) -> actionkit::Result<ActionResponse> {
        self.journal.lock().unwrap().push(format!("{}>", self.label));
        let response = next.run(request).await;
        self.journal.lock().unwrap().push(format!("<{}", self.label));
        response
    }
}

#[tokio::test]
async fn nested_groups_run_outer_middleware_first() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let trace = |label| Trace {
        label,
        journal: Arc::clone(&journal),
    };
    let handler_journal = Arc::clone(&journal);

    let app = Application::builder()
        .group(
            RouteGroup::new("/outer")
                .middleware(trace("outer-1"))
                .middleware(trace("outer-2"))
                .group(
                    RouteGroup::new("/inner").middleware(trace("inner")).get(
                        "/leaf",
                        Action::from_fn(move |_request, response| {
                            let journal = Arc::clone(&handler_journal);
                            async move {
                                journal.lock().unwrap().push("handler".to_string());
                                Ok(response)
                            }
                        }),
                    ),
                ),
        )
        .build()
        .unwrap();

    let response = app
        .dispatch(Request::builder().uri("/outer/inner/leaf").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        *journal.lock().unwrap(),
        vec!["outer-1>", "outer-2>", "inner>", "handler", "<inner", "<outer-2", "<outer-1"]
    );
}

#[tokio::test]
async fn params_prefer_body_then_query_then_path() {
    let app = Application::builder()
        .group(RouteGroup::new("/echo").post(
            "/{id}",
            Action::from_fn(|request, response| async move {
                let params = request.params(["id", "tag", "page", "missing"]);
                helpers::json(response, &params, StatusCode::OK)
            }),
        ))
        .build()
        .unwrap();

    let response = app
        .dispatch(json_post(
            "/echo/7?tag=query&page=1&page=2&id=from-query",
            json!({"tag": "body", "id": null}),
        ))
        .await;

    assert_eq!(
        read_json(response).await,
        json!({"id": "from-query", "tag": "body", "page": "2", "missing": null})
    );
}

#[tokio::test]
async fn form_bodies_are_params_too() {
    let app = Application::builder()
        .group(RouteGroup::new("/forms").post(
            "/",
            Action::from_fn(|request, response| async move {
                let name = request.param("name");
                helpers::json(response, &name, StatusCode::OK)
            }),
        ))
        .build()
        .unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/forms")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("name=ada+lovelace"))
        .unwrap();
    assert_eq!(read_json(app.dispatch(request).await).await, json!("ada lovelace"));
}

#[tokio::test]
async fn unmatched_path_is_404() {
    let app = account_app();
    let response = app
        .dispatch(Request::builder().uri("/nowhere").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
