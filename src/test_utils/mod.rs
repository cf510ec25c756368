#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use db::{TestDatabase, create_overall_kpis_view, drop_view};
pub(crate) use html::{
    assert_element_exists, assert_element_missing, assert_valid_html, parse_html_document,
    parse_html_fragment, select_text,
};
pub(crate) use http::{assert_content_type, assert_status_ok, get_header};
