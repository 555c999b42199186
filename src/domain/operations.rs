//! The two Application Signals queries: validation, upstream call(s), report.

use chrono::Utc;
use tracing::{debug, info};

use crate::appsignals_client::ApplicationSignalsApi;
use crate::domain::format::{format_service_detail, format_service_list, service_not_found_message};
use crate::domain::models::{GetServiceRequest, GetServiceResponse, ListServicesResponse};
use crate::domain::params::{GetServiceDetailParams, ListServicesParams, DETAIL_LOOKUP_MAX_RESULTS};
use crate::errors::ToolError;

pub async fn list_monitored_services(
    api: &dyn ApplicationSignalsApi,
    hours_back: i64,
    max_results: i64,
) -> Result<String, ToolError> {
    let params = ListServicesParams::for_lookback(hours_back, max_results, Utc::now())?;

    let response = ListServicesResponse::from_wire(api.list_services(&params).await?)?;
    info!(
        services = response.summaries().len(),
        has_more = response.next_token.is_some(),
        "listed application signals services"
    );

    Ok(format_service_list(&response))
}

pub async fn get_service_detail(
    api: &dyn ApplicationSignalsApi,
    service_name: String,
    hours_back: i64,
) -> Result<String, ToolError> {
    let params = GetServiceDetailParams::new(service_name, hours_back)?;
    let (start_time, end_time) = params.window(Utc::now())?;

    let lookup = ListServicesParams {
        max_results: DETAIL_LOOKUP_MAX_RESULTS,
        ..ListServicesParams::new(start_time, end_time)
    };
    let listing = ListServicesResponse::from_wire(api.list_services(&lookup).await?)?;

    let Some(key_attributes) = listing
        .find_by_name(&params.service_name)
        .and_then(|summary| summary.key_attributes.as_ref())
    else {
        debug!(
            service_name = %params.service_name,
            scanned = listing.summaries().len(),
            "service not present in listing"
        );
        return Ok(service_not_found_message(&params.service_name));
    };

    let request = GetServiceRequest {
        start_time,
        end_time,
        key_attributes: key_attributes.to_wire_map(),
    };
    let response = GetServiceResponse::from_wire(api.get_service(&request).await?)?;
    info!(
        service_name = %params.service_name,
        found = response.service.is_some(),
        "fetched application signals service detail"
    );

    Ok(format_service_detail(&params.service_name, &response))
}
