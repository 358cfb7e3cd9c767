#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::OpenApi;
    use utoipa::openapi::{PathItemType, RefOr, schema::Schema};

    fn object_properties(name: &str) -> Vec<String> {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.expect("components are generated");
        match components.schemas.get(name) {
            Some(RefOr::T(Schema::Object(obj))) => obj.properties.keys().cloned().collect(),
            _ => panic!("{} should be an object schema", name),
        }
    }

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();

        let components = openapi.components.as_ref().unwrap();
        for name in ["ErrorResponse", "HealthResponse", "PredictionWindow", "TimeSeriesPoint", "NewsCard"] {
            assert!(components.schemas.contains_key(name), "missing schema {}", name);
        }

        assert!(serde_json::to_string(&openapi).is_ok());
    }

    #[test]
    fn test_error_response_schema_structure() {
        let properties = object_properties("ErrorResponse");
        for field in ["error", "code", "success", "retryable"] {
            assert!(properties.iter().any(|p| p == field), "ErrorResponse lacks {}", field);
        }
    }

    #[test]
    fn test_time_series_point_schema_structure() {
        let properties = object_properties("TimeSeriesPoint");
        for field in ["date", "actual_price", "predicted_price"] {
            assert!(properties.iter().any(|p| p == field), "TimeSeriesPoint lacks {}", field);
        }
    }

    #[test]
    fn test_openapi_paths_are_documented() {
        let openapi = ApiDoc::openapi();

        for path in [
            "/health",
            "/api/news",
            "/api/v1/stocks/search",
            "/api/v1/stocks/{symbol}/dashboard",
            "/api/v1/stocks/{symbol}/news",
            "/api/v1/stocks/{symbol}/predictions",
            "/api/v1/stocks/{symbol}/predictions/latest",
        ] {
            let item = openapi.paths.paths.get(path).unwrap_or_else(|| panic!("missing path {}", path));
            assert!(item.operations.contains_key(&PathItemType::Get), "{} has no GET", path);
        }
    }

    #[test]
    fn test_prediction_endpoint_documents_gateway_errors() {
        let openapi = ApiDoc::openapi();
        let item = openapi.paths.paths.get("/api/v1/stocks/{symbol}/predictions").unwrap();
        let operation = item.operations.get(&PathItemType::Get).unwrap();

        for status in ["200", "400", "502", "504"] {
            assert!(operation.responses.responses.contains_key(status), "missing {} response", status);
        }
    }

    #[test]
    fn test_all_error_responses_reference_correct_schema() {
        let openapi_json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

        assert!(!openapi_json.contains("crate.schemas.ErrorResponse"));
        assert!(!openapi_json.contains("crate::schemas::ErrorResponse"));
        assert!(openapi_json.contains("#/components/schemas/ErrorResponse"));
    }
}
