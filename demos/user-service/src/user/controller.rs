use super::model::{CreateUserRequest, User};
use super::repository::UserRepository;
use actionkit::prelude::*;
use actionkit::validation::{Rule, RuleValidator, Validator};
use serde_json::json;

#[derive(Injectable)]
pub struct UserController {
    router: Arc<dyn UrlGenerator>,
    validator: Arc<RuleValidator>,
    repository: Arc<dyn UserRepository>,
}

impl ActionController for UserController {
    fn router(&self) -> actionkit::Result<&dyn UrlGenerator> {
        Ok(self.router.as_ref())
    }

    fn validator(&self) -> actionkit::Result<&dyn Validator> {
        Ok(self.validator.as_ref())
    }
}

impl UserController {
    /// `POST /userService/create`
    pub async fn create(
        self: Arc<Self>,
        request: ActionRequest,
        response: ActionResponse,
    ) -> actionkit::Result<ActionResponse> {
        let input = self.params(&request, ["name", "email"]);
        let valid = self.validator.validate(
            &input,
            [
                ("name", &[Rule::Required, Rule::MaxLength(64)][..]),
                ("email", &[Rule::Required, Rule::Email][..]),
            ],
        );
        if !valid {
            return self.validation_errors(response);
        }

        let req: CreateUserRequest = input.deserialize()?;
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: req.name,
            email: req.email,
        };
        tracing::info!(id = %user.id, "user created");
        let id = user.id.clone();
        self.repository.save(user).await;

        self.created(response, "users.show", [("id", id)])
    }

    /// `GET /userService/users/{id}`
    pub async fn show(
        self: Arc<Self>,
        request: ActionRequest,
        response: ActionResponse,
    ) -> actionkit::Result<ActionResponse> {
        let id = request.path_param("id").unwrap_or_default();
        match self.repository.find_by_id(id).await {
            Some(user) => self.json(response, &user),
            None => self.ok(
                response,
                &json!({"error": format!("user {id} not found")}),
                StatusCode::NOT_FOUND,
            ),
        }
    }
}
