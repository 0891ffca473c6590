use crate::api::traits::{AuthApi, ListingSource};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::filters::{FilterState, QueryBuilder, QueryParams};
use crate::models::{
    is_envelope, known_areas, Area, AreaForm, AreaImage, AuthPayload, Envelope, Favorite, Inquiry,
    InquiryStatus, NewInquiry, Paginated, Property, PropertyDraft,
};
use crate::validation::{validate_login, validate_password_change, Registration};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::RwLock;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("urban360/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the 360Urban REST API
pub struct UrbanClient {
    client: Client,
    base_url: Url,
    query: QueryBuilder,
    featured_limit: u32,
    access_token: RwLock<Option<String>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody<'a> {
    email: &'a str,
    password: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
}

#[derive(Deserialize)]
struct FavoritedFlag {
    favorited: bool,
}

impl UrbanClient {
    /// Create a client pointed at the configured API
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let base_url = Url::parse(config.api_url.trim())
            .map_err(|e| Error::Config(format!("invalid API URL {:?}: {e}", config.api_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "API URL {:?} cannot take a path",
                config.api_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            query: QueryBuilder::new(config.page_limit),
            featured_limit: config.featured_limit,
            access_token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!("{} {}", method, url);

        let builder = self.client.request(method, url);
        let token = self
            .access_token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and decode the `data` of the response envelope
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, what: &str) -> Result<T> {
        let response = checked(builder.send().await?, what).await?;
        let body = response.text().await?;
        decode(what, &body)
    }

    /// Send where only success matters
    async fn send_empty(&self, builder: RequestBuilder, what: &str) -> Result<()> {
        let response = checked(builder.send().await?, what).await?;
        let body = response.text().await?;

        if let Ok(envelope) = serde_json::from_str::<Envelope<serde_json::Value>>(&body) {
            if !envelope.success {
                return Err(Error::Rejected(
                    envelope.message.unwrap_or_else(|| format!("{what} failed")),
                ));
            }
        }
        Ok(())
    }

    /// Like [`send`](Self::send), but a 404 means "not found" rather than an error
    async fn lookup<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        what: &str,
    ) -> Result<Option<T>> {
        let result = found(self.send(self.request(Method::GET, segments), what).await)?;
        if result.is_none() {
            debug!("{} not found at {}", what, segments.join("/"));
        }
        Ok(result)
    }

    /// Display name sent alongside the slug: the server's area, then the
    /// built-in Abuja list, then "Unknown".
    async fn area_name(&self, slug: &str) -> String {
        match self.area_by_slug(slug).await {
            Ok(Some(area)) => return area.name,
            Ok(None) => {}
            Err(e) => warn!("Could not look up area {}: {}", slug, e),
        }
        fallback_area_name(slug)
    }

    // Properties

    pub async fn properties(&self, filters: &FilterState) -> Result<Paginated<Property>> {
        filters.validate()?;
        self.properties_with(&self.query.build(filters)).await
    }

    /// Everything the admin table shows on one page
    pub async fn admin_properties(&self) -> Result<Paginated<Property>> {
        self.properties_with(&QueryBuilder::admin().build(&FilterState::default()))
            .await
    }

    pub async fn properties_with(&self, query: &QueryParams) -> Result<Paginated<Property>> {
        debug!("Fetching properties with {}", query);
        let page: Paginated<Property> = self
            .send(
                self.request(Method::GET, &["properties"]).query(query.pairs()),
                "property list",
            )
            .await?;
        info!("Fetched {} of {} properties", page.data.len(), page.total);
        Ok(page)
    }

    pub async fn featured(&self, limit: Option<u32>) -> Result<Vec<Property>> {
        let limit = limit.unwrap_or(self.featured_limit);
        self.send(
            self.request(Method::GET, &["properties", "featured"])
                .query(&[("limit", limit)]),
            "featured properties",
        )
        .await
    }

    pub async fn property_by_slug(&self, slug: &str) -> Result<Option<Property>> {
        self.lookup(&["properties", "slug", slug], "property")
            .await
    }

    pub async fn property_by_id(&self, id: &str) -> Result<Option<Property>> {
        self.lookup(&["properties", id], "property").await
    }

    pub async fn create_property(&self, draft: &PropertyDraft) -> Result<Property> {
        draft.validate()?;
        let body = property_body(draft, &self.area_name(&draft.area_slug).await)?;
        let created: Property = self
            .send(
                self.request(Method::POST, &["properties"]).json(&body),
                "create property",
            )
            .await?;
        info!("Created property {} ({})", created.title, created.id);
        Ok(created)
    }

    pub async fn update_property(&self, id: &str, draft: &PropertyDraft) -> Result<Property> {
        draft.validate()?;
        let body = property_body(draft, &self.area_name(&draft.area_slug).await)?;
        self.send(
            self.request(Method::PATCH, &["properties", id]).json(&body),
            "update property",
        )
        .await
    }

    pub async fn delete_property(&self, id: &str) -> Result<()> {
        self.send_empty(
            self.request(Method::DELETE, &["properties", id]),
            "delete property",
        )
        .await?;
        info!("Deleted property {}", id);
        Ok(())
    }

    // Areas

    pub async fn areas(&self) -> Result<Vec<Area>> {
        self.send(self.request(Method::GET, &["areas"]), "area list")
            .await
    }

    pub async fn area_by_slug(&self, slug: &str) -> Result<Option<Area>> {
        self.lookup(&["areas", "slug", slug], "area").await
    }

    pub async fn area_by_id(&self, id: &str) -> Result<Option<Area>> {
        self.lookup(&["areas", id], "area").await
    }

    pub async fn create_area(&self, form: &AreaForm) -> Result<Area> {
        form.validate()?;
        let body = area_form(form).await?;
        self.send(
            self.request(Method::POST, &["areas"]).multipart(body),
            "create area",
        )
        .await
    }

    pub async fn update_area(&self, id: &str, form: &AreaForm) -> Result<Area> {
        form.validate()?;
        let body = area_form(form).await?;
        self.send(
            self.request(Method::PATCH, &["areas", id])
                .multipart(body),
            "update area",
        )
        .await
    }

    // Favorites

    pub async fn add_favorite(&self, property_id: &str) -> Result<Favorite> {
        self.send(
            self.request(Method::POST, &["favorites", property_id]),
            "add favorite",
        )
        .await
    }

    pub async fn remove_favorite(&self, property_id: &str) -> Result<()> {
        self.send_empty(
            self.request(Method::DELETE, &["favorites", property_id]),
            "remove favorite",
        )
        .await
    }

    pub async fn favorites(&self, page: u32, limit: u32) -> Result<Paginated<Favorite>> {
        self.send(
            self.request(Method::GET, &["favorites"])
                .query(&[("page", page), ("limit", limit)]),
            "favorites",
        )
        .await
    }

    pub async fn is_favorited(&self, property_id: &str) -> Result<bool> {
        let flag: FavoritedFlag = self
            .send(
                self.request(Method::GET, &["favorites", property_id, "check"]),
                "favorite check",
            )
            .await?;
        Ok(flag.favorited)
    }

    // Inquiries

    pub async fn submit_inquiry(&self, inquiry: &NewInquiry) -> Result<Inquiry> {
        self.send(
            self.request(Method::POST, &["inquiries"]).json(inquiry),
            "submit inquiry",
        )
        .await
    }

    pub async fn inquiries(&self, status: Option<InquiryStatus>) -> Result<Paginated<Inquiry>> {
        let mut builder = self.request(Method::GET, &["inquiries"]);
        if let Some(status) = status {
            builder = builder.query(&[("status", status)]);
        }
        self.send(builder, "inquiries").await
    }

    pub async fn update_inquiry_status(&self, id: &str, status: InquiryStatus) -> Result<Inquiry> {
        self.send(
            self.request(Method::PATCH, &["inquiries", id, "status"])
                .json(&json!({ "status": status })),
            "update inquiry",
        )
        .await
    }

    pub async fn delete_inquiry(&self, id: &str) -> Result<()> {
        self.send_empty(
            self.request(Method::DELETE, &["inquiries", id]),
            "delete inquiry",
        )
        .await
    }
}

#[async_trait]
impl ListingSource for UrbanClient {
    async fn fetch_properties(&self, filters: &FilterState) -> Result<Paginated<Property>> {
        self.properties(filters).await
    }

    async fn fetch_areas(&self) -> Result<Vec<Area>> {
        self.areas().await
    }

    fn source_name(&self) -> &'static str {
        "360Urban API"
    }
}

#[async_trait]
impl AuthApi for UrbanClient {
    async fn login(&self, email: &str, password: &str) -> Result<AuthPayload> {
        validate_login(email, password)?;
        self.send(
            self.request(Method::POST, &["auth", "login"])
                .json(&json!({ "email": email.trim(), "password": password })),
            "login",
        )
        .await
    }

    async fn register(&self, form: &Registration) -> Result<AuthPayload> {
        form.validate()?;
        let body = RegisterBody {
            email: form.email.trim(),
            password: &form.password,
            first_name: form.first_name.trim(),
            last_name: form.last_name.trim(),
            phone: form.phone.as_deref().filter(|p| !p.trim().is_empty()),
        };
        self.send(
            self.request(Method::POST, &["auth", "register"]).json(&body),
            "registration",
        )
        .await
    }

    async fn logout(&self) -> Result<()> {
        self.send_empty(self.request(Method::POST, &["auth", "logout"]), "logout")
            .await
    }

    async fn change_password(&self, old_password: &str, new_password: &str) -> Result<()> {
        validate_password_change(old_password, new_password)?;
        self.send_empty(
            self.request(Method::POST, &["auth", "change-password"]).json(&json!({
                "oldPassword": old_password,
                "newPassword": new_password,
            })),
            "change password",
        )
        .await
    }

    fn set_access_token(&self, token: Option<String>) {
        *self
            .access_token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = token;
    }
}

/// Turn a non-2xx response into [`Error::Status`], keeping the server's message
async fn checked(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(status, &body);
    if status != StatusCode::NOT_FOUND {
        warn!("{} returned status {}: {}", what, status, message);
    }
    Err(Error::Status { status, message })
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Envelope<serde_json::Value>>(body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}

/// Unwrap the `{success, message, data}` envelope when present. A failed
/// envelope is an error whatever its `data` looks like.
fn decode<T: DeserializeOwned>(what: &str, body: &str) -> Result<T> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if !is_envelope(&value) {
        return Ok(serde_json::from_value(value)?);
    }

    let envelope: Envelope<serde_json::Value> = serde_json::from_value(value)?;
    if !envelope.success {
        return Err(Error::Rejected(
            envelope.message.unwrap_or_else(|| format!("{what} failed")),
        ));
    }

    let data = envelope
        .data
        .ok_or_else(|| Error::MissingData(what.to_string()))?;
    Ok(serde_json::from_value(data)?)
}

/// 404 becomes `None`, every other failure stays an error
fn found<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

fn fallback_area_name(slug: &str) -> String {
    known_areas()
        .into_iter()
        .find(|area| area.slug == slug)
        .map(|area| area.name)
        .unwrap_or_else(|| "Unknown".to_string())
}

fn property_body(draft: &PropertyDraft, area_name: &str) -> Result<serde_json::Value> {
    let mut body = serde_json::to_value(draft)?;
    if let Some(map) = body.as_object_mut() {
        map.insert("slug".to_string(), json!(draft.slug()));
        map.insert("area".to_string(), json!(area_name));
        map.insert(
            "images".to_string(),
            json!(draft
                .images
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()),
        );
    }
    Ok(body)
}

async fn area_form(form: &AreaForm) -> Result<Form> {
    let mut body = Form::new()
        .text("name", form.name.trim().to_string())
        .text("description", form.description.clone());

    match &form.image {
        Some(AreaImage::Upload(path)) => {
            let bytes = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            debug!("Attaching {} ({} bytes)", file_name, bytes.len());
            body = body.part("image", Part::bytes(bytes).file_name(file_name));
        }
        Some(AreaImage::Existing(url)) => body = body.text("image", url.clone()),
        None => {}
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use std::io::Write;
    use std::path::PathBuf;

    /// Nothing listens here, so any request that escapes validation fails as `Http`
    fn offline_client() -> UrbanClient {
        let config = Config {
            api_url: "http://127.0.0.1:9/api".into(),
            ..Config::default()
        };
        UrbanClient::new(&config).unwrap()
    }

    #[test]
    fn decodes_paginated_envelope() {
        let body = r#"{
            "success": true,
            "message": "ok",
            "data": {
                "data": [{
                    "id": "1", "title": "Flat", "slug": "flat", "category": "Rent",
                    "propertyType": "Flat", "areaSlug": "jabi", "price": 900000
                }],
                "total": 41, "page": 1, "limit": 20
            }
        }"#;

        let page: Paginated<Property> = decode("property list", body).unwrap();
        assert_eq!(page.total, 41);
        assert_eq!(page.data[0].category, Category::Rent);
    }

    #[test]
    fn failed_envelope_is_rejected_with_server_message() {
        let body = r#"{"success": false, "message": "Slug already taken"}"#;
        let err = decode::<Property>("create property", body).unwrap_err();
        assert_eq!(err.user_message(), "Slug already taken");
    }

    #[test]
    fn failed_envelope_with_empty_list_is_still_rejected() {
        let body = r#"{"success":false,"message":"Database unavailable","data":[]}"#;
        let err = decode::<Paginated<Property>>("property list", body).unwrap_err();
        assert!(matches!(&err, Error::Rejected(m) if m == "Database unavailable"));
    }

    #[test]
    fn envelope_around_a_plain_list_counts_its_items() {
        let body = r#"{"success": true, "data": [{
            "id": "1", "title": "Flat", "slug": "flat", "category": "Rent",
            "propertyType": "Flat", "areaSlug": "jabi", "price": 900000
        }]}"#;

        let page: Paginated<Property> = decode("property list", body).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.total, 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 1);
    }

    #[test]
    fn empty_envelope_is_missing_data() {
        let body = r#"{"success": true, "message": "ok"}"#;
        assert!(matches!(
            decode::<Vec<Area>>("area list", body),
            Err(Error::MissingData(_))
        ));
    }

    #[test]
    fn bare_payloads_are_accepted() {
        let areas: Vec<Area> = decode("area list", r#"[{"name": "Jabi", "slug": "jabi"}]"#).unwrap();
        assert_eq!(areas[0].slug, "jabi");
    }

    #[test]
    fn not_found_becomes_none() {
        let missing: Result<Property> = Err(Error::Status {
            status: StatusCode::NOT_FOUND,
            message: "Property not found".into(),
        });
        assert!(found(missing).unwrap().is_none());

        let broken: Result<Property> = Err(Error::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "boom".into(),
        });
        assert!(matches!(found(broken), Err(Error::Status { .. })));

        assert_eq!(found(Ok(7)).unwrap(), Some(7));
    }

    #[test]
    fn error_message_prefers_server_text() {
        assert_eq!(
            error_message(StatusCode::UNAUTHORIZED, r#"{"success":false,"message":"Invalid credentials"}"#),
            "Invalid credentials"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "<html>"), "Bad Gateway");
    }

    #[test]
    fn joins_paths_onto_base_url() {
        let config = Config {
            api_url: "http://api.test/v1/".into(),
            ..Config::default()
        };
        let client = UrbanClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://api.test/v1");
        assert_eq!(
            client.endpoint(&["properties"]).as_str(),
            "http://api.test/v1/properties"
        );
        assert_eq!(
            client.endpoint(&["properties", "featured"]).as_str(),
            "http://api.test/v1/properties/featured"
        );
    }

    #[test]
    fn path_segments_are_percent_encoded() {
        let client = offline_client();
        let url = client.endpoint(&["properties", "slug", "a/b?c#d e"]);
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9/api/properties/slug/a%2Fb%3Fc%23d%20e"
        );
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn rejects_unusable_api_urls() {
        for api_url in ["not a url", "mailto:admin@example.com"] {
            let config = Config {
                api_url: api_url.into(),
                ..Config::default()
            };
            assert!(matches!(UrbanClient::new(&config), Err(Error::Config(_))));
        }
    }

    #[tokio::test]
    async fn invalid_forms_fail_before_any_request() {
        let client = offline_client();

        let err = client
            .create_property(&PropertyDraft::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "got {err:?}");

        let err = client
            .update_property("abc", &PropertyDraft::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "got {err:?}");

        let err = client.create_area(&AreaForm::default()).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "got {err:?}");

        let err = client
            .register(&Registration::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "got {err:?}");

        let err = client.login("", "").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "got {err:?}");

        let err = client.change_password("", "short").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn valid_forms_reach_the_network() {
        let err = offline_client().login("ada@example.com", "secret-pass").await.unwrap_err();
        assert!(matches!(err, Error::Http(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn area_form_attaches_uploads_and_existing_images() {
        let mut upload = tempfile::NamedTempFile::new().unwrap();
        upload.write_all(b"\x89PNG fake image").unwrap();

        let form = AreaForm {
            name: " Jabi ".into(),
            description: "Lakeside district".into(),
            image: Some(AreaImage::Upload(upload.path().to_path_buf())),
        };
        assert!(area_form(&form).await.is_ok());

        let existing = AreaForm {
            image: Some(AreaImage::Existing("https://cdn.test/jabi.jpg".into())),
            ..form.clone()
        };
        assert!(area_form(&existing).await.is_ok());

        let without_image = AreaForm { image: None, ..form };
        assert!(area_form(&without_image).await.is_ok());
    }

    #[tokio::test]
    async fn area_form_surfaces_missing_upload() {
        let form = AreaForm {
            name: "Jabi".into(),
            description: String::new(),
            image: Some(AreaImage::Upload(PathBuf::from("/nonexistent/jabi.png"))),
        };
        assert!(matches!(area_form(&form).await, Err(Error::Io(_))));
    }

    #[test]
    fn property_body_carries_slug_area_and_trimmed_images() {
        let draft = PropertyDraft {
            title: "Two Bed Terrace".into(),
            price: 3_000_000,
            area_slug: "lugbe".into(),
            images: vec!["a.jpg".into(), "  ".into()],
            ..PropertyDraft::default()
        };
        let body = property_body(&draft, "Lugbe").unwrap();
        assert_eq!(body["slug"], "two-bed-terrace");
        assert_eq!(body["area"], "Lugbe");
        assert_eq!(body["areaSlug"], "lugbe");
        assert_eq!(body["images"], json!(["a.jpg"]));
        assert_eq!(body["propertyType"], "Flat");
    }

    #[test]
    fn area_name_falls_back_to_known_areas_then_unknown() {
        assert_eq!(fallback_area_name("gwarinpa"), "Gwarinpa");
        assert_eq!(fallback_area_name("asokoro"), "Unknown");
    }
}
