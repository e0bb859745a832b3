use std::sync::Arc;

use crate::service::{AssessmentService, Grader};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub grader: Arc<Grader>,
    pub assessments: Arc<AssessmentService>,
}

impl AppState {
    pub fn new(grader: Arc<Grader>, assessments: Arc<AssessmentService>) -> Self {
        Self {
            grader,
            assessments,
        }
    }
}
