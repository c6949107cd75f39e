use heck::{ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

use crate::ir::NormalizedName;
use crate::parse::operation::HttpMethod;

/// Create a `NormalizedName` from an arbitrary string, computing all casing variants.
pub fn normalize_name(name: &str) -> NormalizedName {
    let sanitized = sanitize_identifier(name);

    NormalizedName {
        original: name.to_string(),
        pascal_case: sanitized.to_pascal_case(),
        camel_case: sanitized.to_lower_camel_case(),
        snake_case: sanitized.to_snake_case(),
        screaming_snake: sanitized.to_shouty_snake_case(),
    }
}

/// Word title-casing: the first letter of every alphabetic run is upper-cased,
/// the rest lower-cased. Other characters are kept.
///
/// - `users` → `Users`
/// - `userId` → `Userid`
/// - `user_id` → `User_Id`
/// - `v2beta` → `V2Beta`
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Derive an operation id from HTTP method + path.
///
/// Examples:
/// - `GET /users` → `GetUsers`
/// - `GET /users/{id}` → `GetUsersById`
/// - `POST /users/{user_id}/messages` → `PostUsersByUser_IdMessages`
/// - `DELETE /pet-store/{id}` → `DeletePetStoreById`
///
/// Characters that cannot appear in an identifier are dropped after casing.
pub fn calc_endpoint_name(method: HttpMethod, path: &str) -> String {
    let mut name = title_case(method.key());
    for segment in path.split('/') {
        let part = match segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
        {
            Some(param) => format!("By{}", title_case(param.trim())),
            None => title_case(segment),
        };
        name.extend(part.chars().filter(|c| c.is_alphanumeric() || *c == '_'));
    }
    name
}

/// Exported identifier: `_`-separated words are joined with their first letter
/// upper-cased, then the first letter of the result is upper-cased.
///
/// - `pet_id` → `PetId`
/// - `HTTPServer` → `HTTPServer`
pub fn label(text: &str) -> String {
    upper_first(&join_words(text))
}

/// Unexported identifier: like [`label`] but with a lower-cased first letter.
pub fn private_case(text: &str) -> String {
    lower_first(&join_words(text))
}

/// Upper-case the first letter of every `_`-separated word and join them.
pub fn pascal_case(text: &str) -> String {
    text.split('_').map(upper_first).collect()
}

fn join_words(text: &str) -> String {
    if text.contains('_') {
        text.split('_').map(label).collect()
    } else {
        text.to_string()
    }
}

fn upper_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Sanitize a string to be a valid identifier.
fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    if result.is_empty() {
        return "unnamed".to_string();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        let n = normalize_name("listPets");
        assert_eq!(n.pascal_case, "ListPets");
        assert_eq!(n.camel_case, "listPets");
        assert_eq!(n.snake_case, "list_pets");
        assert_eq!(n.screaming_snake, "LIST_PETS");
    }

    #[test]
    fn test_special_chars() {
        let n = normalize_name("application/json");
        assert_eq!(n.pascal_case, "ApplicationJson");
        assert_eq!(normalize_name("--").original, "--");
        assert_eq!(normalize_name("--").pascal_case, "Unnamed");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("users"), "Users");
        assert_eq!(title_case("userId"), "Userid");
        assert_eq!(title_case("user_id"), "User_Id");
        assert_eq!(title_case("v2beta"), "V2Beta");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_endpoint_name_with_param() {
        assert_eq!(
            calc_endpoint_name(HttpMethod::Get, "/users/{id}"),
            "GetUsersById"
        );
    }

    #[test]
    fn test_endpoint_name_root_and_nested() {
        assert_eq!(calc_endpoint_name(HttpMethod::Get, "/"), "Get");
        assert_eq!(
            calc_endpoint_name(HttpMethod::Post, "/users/{user_id}/messages"),
            "PostUsersByUser_IdMessages"
        );
        assert_eq!(
            calc_endpoint_name(HttpMethod::Delete, "/pet-store/{ id }"),
            "DeletePetStoreById"
        );
    }

    #[test]
    fn test_label_and_private() {
        assert_eq!(label("pet_id"), "PetId");
        assert_eq!(label("HTTPServer"), "HTTPServer");
        assert_eq!(label("createUserBody"), "CreateUserBody");
        assert_eq!(private_case("Pet_Id"), "petId");
        assert_eq!(private_case("Limit"), "limit");
        assert_eq!(label(""), "");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("api_key"), "ApiKey");
        assert_eq!(pascal_case("petstore_auth"), "PetstoreAuth");
        assert_eq!(pascal_case("getPet"), "GetPet");
    }
}
