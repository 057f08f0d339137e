use actix_multipart::Multipart;
use actix_web::{
    error, get,
    http::{header, StatusCode},
    post, put, web, HttpRequest, HttpResponse, ResponseError,
};
use futures_util::StreamExt as _;
use serde::Deserialize;
use serde_json::json;

use crate::{
    consts::consts::{PersonId, PersonIdRangeError},
    gateway::gateway::{ContactForm, GatewayError, ValidationGateway},
    model::{location::LocationRecord, person::PersonRecord},
    validation::rules::Violation,
};

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            GatewayError::Validation(violations) => HttpResponse::build(self.status_code()).json(
                json!({ "error": "validation", "violations": violations }),
            ),
            GatewayError::NotFound => HttpResponse::build(self.status_code())
                .json(json!({ "error": "not_found", "message": self.to_string() })),
        }
    }
}

/// Registers every route plus the JSON payload error handler. Shared between
/// the binary and the handler tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(home)
        .service(create_person)
        .service(show_person_detail)
        .service(show_person_by_id)
        .service(update_person)
        .service(login)
        .service(contact)
        .service(post_image);
}

// Body-level deserialization failures (malformed JSON, unknown enum values)
// are framework-detected violations, surface them with the same 422 shape as
// the rule engine
fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::UnprocessableEntity().json(json!({
        "error": "validation",
        "violations": [{ "field": "body", "rule": "json_payload", "message": err.to_string() }],
    }));

    error::InternalError::from_response(err, response).into()
}

fn parse_person_id(raw: i64) -> Result<PersonId, GatewayError> {
    PersonId::try_from(raw).map_err(|PersonIdRangeError::NegativeOrZero(value)| {
        GatewayError::Validation(vec![Violation {
            field: "person_id".to_string(),
            rule: "range".to_string(),
            message: format!("must be greater than 0, got {}", value),
        }])
    })
}

#[get("/")]
async fn home() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "Hello": "World" }))
}

#[post("/person/new")]
async fn create_person(
    gateway: web::Data<ValidationGateway>,
    person: web::Json<PersonRecord>,
) -> Result<HttpResponse, GatewayError> {
    let view = gateway.validate_and_echo_person(&person)?;

    Ok(HttpResponse::Created().json(view))
}

#[derive(Deserialize)]
struct PersonDetailQuery {
    name: Option<String>,
    age: Option<String>,
}

#[get("/person/detail")]
async fn show_person_detail(
    gateway: web::Data<ValidationGateway>,
    query: web::Query<PersonDetailQuery>,
) -> Result<HttpResponse, GatewayError> {
    let echo = gateway.person_detail(query.name.as_deref(), query.age.as_deref())?;

    Ok(HttpResponse::Ok().json(echo))
}

#[get("/person/detail/{person_id}")]
async fn show_person_by_id(
    gateway: web::Data<ValidationGateway>,
    path: web::Path<i64>,
) -> Result<HttpResponse, GatewayError> {
    let person_id = parse_person_id(path.into_inner())?;

    gateway.lookup_person_by_id(person_id)?;

    Ok(HttpResponse::Ok()
        .json(json!({ "person_id": person_id.to_number(), "message": "It exists!" })))
}

#[derive(Deserialize)]
struct UpdatePersonBody {
    person: PersonRecord,
    location: Option<LocationRecord>,
}

#[put("/person/{person_id}")]
async fn update_person(
    gateway: web::Data<ValidationGateway>,
    path: web::Path<i64>,
    body: web::Json<UpdatePersonBody>,
) -> Result<HttpResponse, GatewayError> {
    let person_id = parse_person_id(path.into_inner())?;

    // The route contract is 204 No Content; the merged union is still
    // computed so invalid input from either record is rejected
    let merged = gateway.update_person(person_id, &body.person, body.location.as_ref())?;

    log::debug!(
        "updated person {} ({} {})",
        person_id,
        merged.person.first_name,
        merged.person.last_name
    );

    Ok(HttpResponse::NoContent().finish())
}

#[derive(Deserialize)]
struct LoginForm {
    username: Option<String>,
    password: Option<String>,
}

#[post("/login")]
async fn login(
    gateway: web::Data<ValidationGateway>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, GatewayError> {
    let result = gateway.login(form.username.as_deref(), form.password.as_deref())?;

    Ok(HttpResponse::Ok().json(result))
}

#[post("/contact")]
async fn contact(
    gateway: web::Data<ValidationGateway>,
    form: web::Form<ContactForm>,
    request: HttpRequest,
) -> Result<HttpResponse, GatewayError> {
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();

    let ads_cookie = request.cookie("ads");

    let receipt = gateway.contact(
        &form,
        &user_agent,
        ads_cookie.as_ref().map(|cookie| cookie.value()),
    )?;

    Ok(HttpResponse::Ok().json(receipt))
}

#[post("/post-image")]
async fn post_image(
    gateway: web::Data<ValidationGateway>,
    mut payload: Multipart,
) -> Result<HttpResponse, actix_web::Error> {
    // First field carrying a filename wins, other fields are ignored
    while let Some(item) = payload.next().await {
        let mut field = item?;

        let filename = match field.content_disposition().get_filename() {
            Some(filename) => filename.to_string(),
            None => continue,
        };

        let content_type = field
            .content_type()
            .map(|mime| mime.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let mut bytes: Vec<u8> = Vec::new();

        while let Some(chunk) = field.next().await {
            bytes.extend_from_slice(&chunk?);
        }

        let summary = gateway.upload_file(filename, content_type, &bytes);

        return Ok(HttpResponse::Ok().json(summary));
    }

    Err(GatewayError::Validation(vec![Violation {
        field: "image".to_string(),
        rule: "required".to_string(),
        message: "a file part is required".to_string(),
    }])
    .into())
}
