use llms_txt_core::{
    generate_llms_txt, get_operation_spec, ApiDocument, AppError, DocumentSource, FileSource,
    DEFAULT_MOUNT_PATH,
};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample_openapi.json")
}

fn sample_document() -> ApiDocument {
    FileSource::new(fixture_path()).load().unwrap()
}

fn sample_llms_txt() -> String {
    generate_llms_txt(&sample_document(), DEFAULT_MOUNT_PATH)
}

fn has_ref(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.contains_key("$ref") || map.values().any(has_ref),
        Value::Array(items) => items.iter().any(has_ref),
        _ => false,
    }
}

#[test]
fn test_header_quotes_the_api_description() {
    let content = sample_llms_txt();
    assert!(content.starts_with(concat!(
        "# Sample API\n",
        "\n",
        "> A sample API demonstrating various OpenAPI features.\n",
        ">\n",
        "> This API includes:\n",
        "> - User management\n",
    )));
}

#[test]
fn test_all_endpoints_are_listed() {
    let content = sample_llms_txt();
    for heading in [
        "### `GET /users` - List users",
        "### `POST /users` - Create user",
        "### `GET /users/{user_id}` - Get user",
        "### `PATCH /users/{user_id}` - Update user",
        "### `DELETE /users/{user_id}` - Delete user",
        "### `GET /posts` - List posts",
        "### `GET /posts/{post_id}` - Get post",
        "### `GET /users/{user_id}/posts` - Get user's posts",
        "### `GET /health` - Health check",
    ] {
        assert!(content.contains(heading), "missing {}", heading);
    }
    assert_eq!(content.matches("[Detailed spec](").count(), 9);
}

#[test]
fn test_tag_groups_follow_first_appearance() {
    let content = sample_llms_txt();
    let users = content.find("## Users\n").unwrap();
    let posts = content.find("## Posts\n").unwrap();
    let system = content.find("## System\n").unwrap();
    assert!(users < posts && posts < system);
    assert!(!content.contains("## Endpoints"));

    // tagged under Posts even though the path sits below /users
    let user_posts = content.find("`GET /users/{user_id}/posts`").unwrap();
    assert!(posts < user_posts && user_posts < system);
}

#[test]
fn test_parameters_show_types_and_locations() {
    let content = sample_llms_txt();
    assert!(content.contains("- `page` (integer, optional): Page number\n"));
    assert!(content.contains("- `per_page` (integer, optional): Items per page\n"));
    assert!(
        content.contains("- `role` (enum[admin, user, guest], optional): Filter by user role\n")
    );
    assert!(content.contains("- `search` (string, optional): Search by name (partial match)\n"));
    assert!(
        content.contains("- `x-api-key` (string, optional) (header): API key for authentication\n")
    );
    assert!(
        content.contains("- `user_id` (string, required) (path): The unique user identifier\n")
    );
    assert!(
        content.contains("- `published_only` (boolean, optional): Only return published posts\n")
    );
}

#[test]
fn test_request_body_expands_nested_objects() {
    let content = sample_llms_txt();
    let create = content.find("### `POST /users`").unwrap();
    let section = &content[create..content.find("### `GET /users/{user_id}`").unwrap()];

    assert!(section.contains("**Body**:\n- `name` (string, required): User's full name\n"));
    assert!(section.contains("- `email` (string, required): User's email address\n"));
    assert!(section.contains("- `role` (enum[admin, user, guest], optional): User's role\n"));
    assert!(section.contains("- `tags` (array[string], optional): User tags for categorization\n"));
    assert!(section.contains(concat!(
        "- `address` (Address, optional): User's address\n",
        "  - `street` (string, required): Street address\n",
        "  - `city` (string, required): City name\n",
        "  - `country` (string, optional): Country code\n",
    )));
}

#[test]
fn test_returns_prefer_created_and_list_fields() {
    let content = sample_llms_txt();
    assert!(content.contains("**Returns** (201): User - Successful Response\n"));
    assert!(content.contains("**Returns** (204): Successful Response\n"));
    assert!(content.contains("**Returns** (200): array[Post] - Successful Response\n"));
    assert!(content.contains(concat!(
        "**Returns** (200): PaginatedUsers - Successful Response\n",
        "- `items` (array[User], required): List of users\n",
    )));
    assert!(content.contains("- `total` (integer, required): Total number of users\n"));
    assert!(content.contains("- `has_next` (boolean, required): Whether more pages exist\n"));
    assert!(!content.contains("**Returns** (422)"));
}

#[test]
fn test_detail_links_use_mount_path() {
    let content = sample_llms_txt();
    assert!(content.contains("[Detailed spec](/llms.txt/paths/GET/users)\n"));
    assert!(content.contains("[Detailed spec](/llms.txt/paths/DELETE/users/{user_id})\n"));

    let custom = generate_llms_txt(&sample_document(), "/api/llms.txt");
    assert!(custom.contains("[Detailed spec](/api/llms.txt/paths/GET/health)"));
}

#[test]
fn test_rendering_is_deterministic() {
    let document = sample_document();
    assert_eq!(
        generate_llms_txt(&document, DEFAULT_MOUNT_PATH),
        generate_llms_txt(&document, DEFAULT_MOUNT_PATH)
    );
    assert!(sample_llms_txt().ends_with("[Detailed spec](/llms.txt/paths/GET/health)\n"));
}

#[test]
fn test_operation_spec_is_fully_resolved() {
    let document = sample_document();
    let spec = get_operation_spec(&document, "post", "/users").unwrap();
    assert_eq!(spec["method"], "POST");
    assert_eq!(spec["path"], "/users");
    assert_eq!(spec["summary"], "Create user");
    assert!(!has_ref(&spec));

    let body = &spec["requestBody"]["content"]["application/json"]["schema"];
    assert_eq!(body["description"], "User data to create");
    assert_eq!(body["properties"]["role"]["enum"], serde_json::json!(["admin", "user", "guest"]));
    let address = &body["properties"]["address"]["anyOf"][0];
    assert_eq!(address["title"], "Address");
    assert!(address["properties"]["street"].is_object());
}

#[test]
fn test_operation_spec_not_found() {
    let document = sample_document();
    let err = get_operation_spec(&document, "get", "/nonexistent").unwrap_err();
    assert!(matches!(err, AppError::OperationNotFound { .. }));
    assert_eq!(err.to_string(), "Operation GET /nonexistent not found");

    let err = get_operation_spec(&document, "put", "/health").unwrap_err();
    assert_eq!(err.to_string(), "Operation PUT /health not found");
}
