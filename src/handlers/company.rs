//! 指数数据接口处理器
//!
//! ## API 列表
//! - GET /companies - 获取公司列表
//! - GET /company/{name} - 获取公司全部记录
//! - GET /company/{name}/{date} - 获取公司指定日期的记录

use actix_web::{web, HttpResponse, Result};
use crate::models::{CompaniesBody, ErrorBody};
use crate::services::dataset::Dataset;

pub async fn list_companies(dataset: web::Data<Dataset>) -> Result<HttpResponse> {
    if dataset.is_empty() {
        return Ok(HttpResponse::InternalServerError().json(ErrorBody::new("No company data available")));
    }

    let response = CompaniesBody { companies: dataset.companies() };
    Ok(HttpResponse::Ok().json(response))
}

pub async fn get_company(
    dataset: web::Data<Dataset>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let name = path.into_inner();
    if dataset.is_empty() {
        return Ok(HttpResponse::InternalServerError().json(ErrorBody::new("No data available")));
    }

    let rows = dataset.company(&name);
    if rows.is_empty() {
        log::warn!("未找到公司: {}", name);
        return Ok(HttpResponse::NotFound().json(ErrorBody::new("Company not found")));
    }

    Ok(HttpResponse::Ok().json(rows))
}

pub async fn get_company_on(
    dataset: web::Data<Dataset>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (name, date) = path.into_inner();
    if dataset.is_empty() {
        return Ok(HttpResponse::InternalServerError().json(ErrorBody::new("No data available")));
    }

    if dataset.company(&name).is_empty() {
        log::warn!("未找到公司: {}", name);
        return Ok(HttpResponse::NotFound().json(ErrorBody::new("Company not found")));
    }

    let rows = dataset.company_on(&name, &date);
    if rows.is_empty() {
        log::warn!("公司 {} 在 {} 无数据", name, date);
        return Ok(HttpResponse::NotFound().json(ErrorBody::new(format!("No data for {}", date))));
    }

    Ok(HttpResponse::Ok().json(rows))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/companies", web::get().to(list_companies))
        .route("/company/{name}", web::get().to(get_company))
        .route("/company/{name}/{date}", web::get().to(get_company_on));
}
