//! HTTP adapter for the dashboard's `/routes` and `/locations` endpoints.

use std::collections::HashSet;

use reqwest::blocking::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::model::{Location, LocationId, Route, RouteId, is_temporary_id};
use crate::traits::{RouteStore, SaveSummary};

#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    client: Client,
}

/// Body of a route creation request.
#[derive(Debug, Serialize)]
struct NewRoute<'a> {
    route: &'a str,
    shift: &'a str,
    warehouse: &'a str,
    description: Option<&'a str>,
}

impl<'a> From<&'a Route> for NewRoute<'a> {
    fn from(route: &'a Route) -> Self {
        Self {
            route: &route.route,
            shift: &route.shift,
            warehouse: &route.warehouse,
            description: route.description.as_deref(),
        }
    }
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn locations_url(&self, route_id: Option<RouteId>) -> String {
        match route_id {
            Some(id) => format!("{}?routeId={}", self.url("locations"), id),
            None => self.url("locations"),
        }
    }

    /// GETs `url` and decodes a JSON array of records.
    fn fetch_list<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        debug!(url, "fetching");
        let response = check_status(self.client.get(url).send()?)?;
        let body: Value = response.json()?;

        if !body.is_array() {
            return Err(Error::InvalidPayload(format!(
                "expected an array from {}, got {}",
                url,
                json_kind(&body)
            )));
        }

        Ok(serde_json::from_value(body)?)
    }

    fn existing_route_ids(&self) -> Result<HashSet<RouteId>> {
        let routes: Vec<Route> = self.fetch_list(&self.url("routes"))?;
        Ok(routes.into_iter().map(|route| route.id).collect())
    }
}

impl RouteStore for ApiClient {
    fn routes(&self) -> Result<Vec<Route>> {
        self.fetch_list(&self.url("routes"))
    }

    fn locations(&self, route_id: Option<RouteId>) -> Result<Vec<Location>> {
        self.fetch_list(&self.locations_url(route_id))
    }

    fn save_routes(&self, routes: &[Route]) -> Result<SaveSummary> {
        let (new_routes, known): (Vec<&Route>, Vec<&Route>) =
            routes.iter().partition(|route| is_temporary_id(route.id));

        // A failed lookup skips the updates but still creates new routes
        let existing = if known.is_empty() {
            HashSet::new()
        } else {
            self.existing_route_ids().unwrap_or_else(|err| {
                warn!(error = %err, "could not list existing routes");
                HashSet::new()
            })
        };

        let (updates, missing): (Vec<&Route>, Vec<&Route>) =
            known.into_iter().partition(|route| existing.contains(&route.id));
        for route in &missing {
            warn!(route = route.id, "route not found on server, skipping update");
        }

        let url = self.url("routes");
        for route in &new_routes {
            check_status(self.client.post(&url).json(&NewRoute::from(*route)).send()?)?;
        }

        let summary = SaveSummary {
            created: new_routes.len(),
            updated: updates.len(),
        };

        if !updates.is_empty() {
            let body = json!({ "routes": updates });
            check_status(self.client.put(&url).json(&body).send()?)?;
        }

        debug!(created = summary.created, updated = summary.updated, "saved routes");
        Ok(summary)
    }

    fn save_locations(&self, locations: &[Location]) -> Result<()> {
        let body = json!({ "locations": locations });
        check_status(self.client.put(self.url("locations")).json(&body).send()?)?;
        debug!(count = locations.len(), "saved locations");
        Ok(())
    }

    fn create_location(&self, location: &Location) -> Result<Location> {
        let request = self.client.post(self.url("locations")).json(location);
        let response = check_status(request.send()?)?;
        Ok(response.json()?)
    }

    fn delete_location(&self, id: LocationId) -> Result<()> {
        let request = self.client.delete(self.url("locations"));
        check_status(request.json(&json!({ "id": id })).send()?)?;
        Ok(())
    }

    fn delete_route(&self, id: RouteId) -> Result<()> {
        let request = self.client.delete(self.url("routes"));
        check_status(request.json(&json!({ "id": id })).send()?)?;
        Ok(())
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    warn!(status = status.as_u16(), %body, "request failed");
    Err(Error::Status {
        status: status.as_u16(),
        body,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_urls() {
        let api = client("http://localhost:3000/api/");
        assert_eq!(api.url("routes"), "http://localhost:3000/api/routes");
        assert_eq!(api.locations_url(None), "http://localhost:3000/api/locations");
        assert_eq!(
            api.locations_url(Some(4)),
            "http://localhost:3000/api/locations?routeId=4"
        );
    }

    #[test]
    fn test_new_route_body() {
        let mut route = Route::new(1_734_953_400_000, "KL 9");
        route.shift = "AM".to_string();
        route.warehouse = "3AVK06".to_string();

        let body = serde_json::to_value(NewRoute::from(&route)).unwrap();
        assert_eq!(
            body,
            json!({ "route": "KL 9", "shift": "AM", "warehouse": "3AVK06", "description": null })
        );
    }

    #[test]
    fn test_json_kind() {
        assert_eq!(json_kind(&json!({})), "an object");
        assert_eq!(json_kind(&json!(null)), "null");
    }
}
