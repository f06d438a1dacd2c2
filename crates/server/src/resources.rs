use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use models::{Account, Customer, DashboardStats, Loan, LoanProduct, Notification, Record, Transaction, User};
use service::{Api, EntityService, ListFilter, Pagination};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiPath};

/// An entity exposed as a JSON collection under `/api/{PATH}`.
pub trait Resource: Record {
    const PATH: &'static str;

    fn service(api: &Api) -> &EntityService<Self>;
}

macro_rules! resource {
    ($entity:ty, $path:literal, $field:ident) => {
        impl Resource for $entity {
            const PATH: &'static str = $path;

            fn service(api: &Api) -> &EntityService<Self> {
                &api.$field
            }
        }
    };
}

resource!(Customer, "customers", customers);
resource!(Account, "accounts", accounts);
resource!(Transaction, "transactions", transactions);
resource!(LoanProduct, "loan-products", loan_products);
resource!(Loan, "loans", loans);
resource!(Notification, "notifications", notifications);
resource!(User, "users", users);

/// `GET|POST /api/{path}` and `GET|PATCH /api/{path}/:id`.
pub fn routes<E: Resource>() -> Router<Api> {
    Router::new()
        .route(&format!("/api/{}", E::PATH), get(list::<E>).post(create::<E>))
        .route(&format!("/api/{}/:id", E::PATH), get(fetch::<E>).patch(update::<E>))
}

async fn list<E: Resource>(
    State(api): State<Api>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<E>>, ApiError> {
    let filter = list_filter(params)?;
    Ok(Json(E::service(&api).list(filter).await?))
}

async fn fetch<E: Resource>(State(api): State<Api>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<E>, ApiError> {
    Ok(Json(E::service(&api).get(id).await?))
}

async fn create<E: Resource>(State(api): State<Api>, ApiJson(input): ApiJson<E::Input>) -> Result<Json<E>, ApiError> {
    Ok(Json(E::service(&api).create(input).await?))
}

async fn update<E: Resource>(
    State(api): State<Api>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<E::Patch>,
) -> Result<Json<E>, ApiError> {
    Ok(Json(E::service(&api).update(id, patch).await?))
}

pub async fn dashboard_stats(State(api): State<Api>) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(api.dashboard.stats().await?))
}

/// Query string to list options.
///
/// `page`/`per_page` paginate, `order=column[.asc|.desc]` sorts, and any other
/// single key is an equality filter on that column.
pub fn list_filter(params: HashMap<String, String>) -> Result<ListFilter, ApiError> {
    let mut filter = ListFilter::new();
    let mut page: Option<Pagination> = None;
    for (key, value) in params {
        match key.as_str() {
            "page" => page.get_or_insert_with(Pagination::default).page = parse_number(&key, &value)?,
            "per_page" => page.get_or_insert_with(Pagination::default).per_page = parse_number(&key, &value)?,
            "order" => {
                let (column, ascending) = match value.rsplit_once('.') {
                    Some((column, "asc")) => (column, true),
                    Some((column, "desc")) => (column, false),
                    _ => (value.as_str(), true),
                };
                filter = filter.order_by(checked_column(column)?, ascending);
            }
            column => {
                if filter.eq.is_some() {
                    return Err(ApiError::bad_request("only one filter column is supported"));
                }
                filter = filter.eq(checked_column(column)?, value);
            }
        }
    }
    if let Some(page) = page {
        filter = filter.page(page);
    }
    Ok(filter)
}

fn parse_number(key: &str, value: &str) -> Result<u32, ApiError> {
    value.parse().map_err(|_| ApiError::bad_request(format!("{key} must be a non-negative integer")))
}

fn checked_column(column: &str) -> Result<&str, ApiError> {
    if !column.is_empty() && column.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(column)
    } else {
        Err(ApiError::bad_request(format!("invalid column name: {column}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::FilterValue;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn query_string_becomes_list_filter() {
        let filter = list_filter(params(&[("status", "active"), ("order", "created_at.desc"), ("per_page", "5")]))
            .expect("filter");
        assert_eq!(filter.eq, Some(("status".to_string(), FilterValue::from("active"))));
        assert_eq!(filter.order, Some(("created_at".to_string(), false)));
        assert_eq!(filter.page, Some(Pagination { page: 1, per_page: 5 }));
    }

    #[test]
    fn bare_order_column_is_ascending() {
        let filter = list_filter(params(&[("order", "name")])).expect("filter");
        assert_eq!(filter.order, Some(("name".to_string(), true)));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(list_filter(params(&[("a", "1"), ("b", "2")])).is_err());
        assert!(list_filter(params(&[("page", "-1")])).is_err());
        assert!(list_filter(params(&[("name;drop", "x")])).is_err());
    }
}
