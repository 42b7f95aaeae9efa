use askama::Template;

use crate::intake_client::CandidateResult;
use crate::state::Notice;

/// The single page of the presentation client: form, notice and result cards.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage<'a> {
    pub job_requirements: &'a str,
    pub results: &'a [CandidateResult],
    pub notice: Option<Notice>,
    pub intake_url: &'a str,
    pub intake_healthy: bool,
}
