//! HAR 1.2 conformance checking
//!
//! Walks the serialized document and checks every requirement the HAR 1.2
//! schema places on the fields this tool emits: required properties, value
//! types, and parseable timestamps. Keys with the conventional `_` prefix
//! are extension fields and are skipped entirely, so the non-standard
//! `_links`/`_renderedSource`/`_failures` additions never trip validation.
//!
//! Violations are accumulated rather than failing fast, so a caller gets
//! the full field-level picture in one pass.

use chrono::DateTime;
use serde_json::Value;

/// One field-level schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path to the offending field, e.g. `log.entries[2].request.url`
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validates a serialized HAR document, returning every violation found.
/// An empty result means the document conforms.
pub fn validate(document: &Value) -> Vec<Violation> {
    let mut violations = Vec::new();

    let Some(log) = document.get("log").and_then(Value::as_object) else {
        violations.push(Violation {
            path: "log".to_string(),
            message: "missing or not an object".to_string(),
        });
        return violations;
    };

    require_string(log, "log.version", "version", &mut violations);

    if let Some(creator) = require_object(log, "log.creator", "creator", &mut violations) {
        require_string(creator, "log.creator.name", "name", &mut violations);
        require_string(creator, "log.creator.version", "version", &mut violations);
    }

    // browser is optional in HAR 1.2; when present it needs name+version
    if let Some(browser) = log.get("browser") {
        match browser.as_object() {
            Some(browser) => {
                require_string(browser, "log.browser.name", "name", &mut violations);
                require_string(browser, "log.browser.version", "version", &mut violations);
            }
            None => violations.push(Violation {
                path: "log.browser".to_string(),
                message: "expected an object".to_string(),
            }),
        }
    }

    match log.get("pages").and_then(Value::as_array) {
        Some(pages) => {
            for (i, page) in pages.iter().enumerate() {
                validate_page(page, &format!("log.pages[{}]", i), &mut violations);
            }
        }
        None => violations.push(Violation {
            path: "log.pages".to_string(),
            message: "missing or not an array".to_string(),
        }),
    }

    match log.get("entries").and_then(Value::as_array) {
        Some(entries) => {
            for (i, entry) in entries.iter().enumerate() {
                validate_entry(entry, &format!("log.entries[{}]", i), &mut violations);
            }
        }
        None => violations.push(Violation {
            path: "log.entries".to_string(),
            message: "missing or not an array".to_string(),
        }),
    }

    violations
}

fn validate_page(page: &Value, path: &str, violations: &mut Vec<Violation>) {
    let Some(page) = as_object(page, path, violations) else {
        return;
    };

    require_string(page, &format!("{}.id", path), "id", violations);
    require_string(page, &format!("{}.title", path), "title", violations);
    require_datetime(
        page,
        &format!("{}.startedDateTime", path),
        "startedDateTime",
        violations,
    );

    let timings_path = format!("{}.pageTimings", path);
    match page.get("pageTimings").and_then(Value::as_object) {
        Some(timings) => {
            require_number(timings, &format!("{}.onContentLoad", timings_path), "onContentLoad", violations);
            require_number(timings, &format!("{}.onLoad", timings_path), "onLoad", violations);
        }
        None => violations.push(Violation {
            path: timings_path,
            message: "missing or not an object".to_string(),
        }),
    }
}

fn validate_entry(entry: &Value, path: &str, violations: &mut Vec<Violation>) {
    let Some(entry) = as_object(entry, path, violations) else {
        return;
    };

    require_string(entry, &format!("{}.pageref", path), "pageref", violations);
    require_datetime(
        entry,
        &format!("{}.startedDateTime", path),
        "startedDateTime",
        violations,
    );
    require_number(entry, &format!("{}.time", path), "time", violations);

    let request_path = format!("{}.request", path);
    match entry.get("request").and_then(Value::as_object) {
        Some(request) => {
            require_string(request, &format!("{}.method", request_path), "method", violations);
            require_string(request, &format!("{}.url", request_path), "url", violations);
            require_string(
                request,
                &format!("{}.httpVersion", request_path),
                "httpVersion",
                violations,
            );
            require_pairs(request, &request_path, "headers", violations);
            require_pairs(request, &request_path, "queryString", violations);
            require_array(request, &format!("{}.cookies", request_path), "cookies", violations);
            require_number(
                request,
                &format!("{}.headersSize", request_path),
                "headersSize",
                violations,
            );
            require_number(request, &format!("{}.bodySize", request_path), "bodySize", violations);
        }
        None => violations.push(Violation {
            path: request_path,
            message: "missing or not an object".to_string(),
        }),
    }

    let response_path = format!("{}.response", path);
    match entry.get("response").and_then(Value::as_object) {
        Some(response) => {
            require_number(response, &format!("{}.status", response_path), "status", violations);
            require_string(
                response,
                &format!("{}.statusText", response_path),
                "statusText",
                violations,
            );
            require_string(
                response,
                &format!("{}.httpVersion", response_path),
                "httpVersion",
                violations,
            );
            require_pairs(response, &response_path, "headers", violations);
            require_array(response, &format!("{}.cookies", response_path), "cookies", violations);
            require_string(
                response,
                &format!("{}.redirectURL", response_path),
                "redirectURL",
                violations,
            );
            require_number(
                response,
                &format!("{}.headersSize", response_path),
                "headersSize",
                violations,
            );
            require_number(
                response,
                &format!("{}.bodySize", response_path),
                "bodySize",
                violations,
            );

            let content_path = format!("{}.content", response_path);
            match response.get("content").and_then(Value::as_object) {
                Some(content) => {
                    require_number(content, &format!("{}.size", content_path), "size", violations);
                    require_string(
                        content,
                        &format!("{}.mimeType", content_path),
                        "mimeType",
                        violations,
                    );
                }
                None => violations.push(Violation {
                    path: content_path,
                    message: "missing or not an object".to_string(),
                }),
            }
        }
        None => violations.push(Violation {
            path: response_path,
            message: "missing or not an object".to_string(),
        }),
    }

    if entry.get("cache").and_then(Value::as_object).is_none() {
        violations.push(Violation {
            path: format!("{}.cache", path),
            message: "missing or not an object".to_string(),
        });
    }

    let timings_path = format!("{}.timings", path);
    match entry.get("timings").and_then(Value::as_object) {
        Some(timings) => {
            // send, wait and receive are the required phases in HAR 1.2
            require_number(timings, &format!("{}.send", timings_path), "send", violations);
            require_number(timings, &format!("{}.wait", timings_path), "wait", violations);
            require_number(timings, &format!("{}.receive", timings_path), "receive", violations);
        }
        None => violations.push(Violation {
            path: timings_path,
            message: "missing or not an object".to_string(),
        }),
    }
}

// ---- helpers -------------------------------------------------------------

type Object = serde_json::Map<String, Value>;

fn as_object<'a>(value: &'a Value, path: &str, violations: &mut Vec<Violation>) -> Option<&'a Object> {
    match value.as_object() {
        Some(object) => Some(object),
        None => {
            violations.push(Violation {
                path: path.to_string(),
                message: "expected an object".to_string(),
            });
            None
        }
    }
}

fn require_object<'a>(
    object: &'a Object,
    path: &str,
    key: &str,
    violations: &mut Vec<Violation>,
) -> Option<&'a Object> {
    match object.get(key).and_then(Value::as_object) {
        Some(object) => Some(object),
        None => {
            violations.push(Violation {
                path: path.to_string(),
                message: "missing or not an object".to_string(),
            });
            None
        }
    }
}

fn require_string(object: &Object, path: &str, key: &str, violations: &mut Vec<Violation>) {
    if object.get(key).and_then(Value::as_str).is_none() {
        violations.push(Violation {
            path: path.to_string(),
            message: "missing or not a string".to_string(),
        });
    }
}

fn require_number(object: &Object, path: &str, key: &str, violations: &mut Vec<Violation>) {
    if !object.get(key).map(Value::is_number).unwrap_or(false) {
        violations.push(Violation {
            path: path.to_string(),
            message: "missing or not a number".to_string(),
        });
    }
}

fn require_array(object: &Object, path: &str, key: &str, violations: &mut Vec<Violation>) {
    if object.get(key).and_then(Value::as_array).is_none() {
        violations.push(Violation {
            path: path.to_string(),
            message: "missing or not an array".to_string(),
        });
    }
}

/// Arrays of `{name, value}` pairs: headers and queryString items.
fn require_pairs(object: &Object, parent_path: &str, key: &str, violations: &mut Vec<Violation>) {
    let path = format!("{}.{}", parent_path, key);
    match object.get(key).and_then(Value::as_array) {
        Some(items) => {
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{}[{}]", path, i);
                match item.as_object() {
                    Some(pair) => {
                        require_string(pair, &format!("{}.name", item_path), "name", violations);
                        require_string(pair, &format!("{}.value", item_path), "value", violations);
                    }
                    None => violations.push(Violation {
                        path: item_path,
                        message: "expected an object".to_string(),
                    }),
                }
            }
        }
        None => violations.push(Violation {
            path,
            message: "missing or not an array".to_string(),
        }),
    }
}

fn require_datetime(object: &Object, path: &str, key: &str, violations: &mut Vec<Violation>) {
    match object.get(key).and_then(Value::as_str) {
        Some(text) => {
            if DateTime::parse_from_rfc3339(text).is_err() {
                violations.push(Violation {
                    path: path.to_string(),
                    message: format!("not an ISO 8601 datetime: {}", text),
                });
            }
        }
        None => violations.push(Violation {
            path: path.to_string(),
            message: "missing or not a string".to_string(),
        }),
    }
}
