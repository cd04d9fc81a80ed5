use crate::Result;

use super::models::Problem;
use super::params::ProblemGetParams;
use super::session::{ApiObject, Session, Transport};

impl ApiObject for Problem {
    const GET_METHOD: &'static str = "problem.get";

    type Params = ProblemGetParams;
}

impl<T: Transport> Session<T> {
    /// Query problems matching `params`.
    ///
    /// # Errors
    ///
    /// [`crate::error::ZbxError::NotFound`] when nothing matched; transport,
    /// API and decode errors otherwise.
    pub async fn get_problems(&self, params: &ProblemGetParams) -> Result<Vec<Problem>> {
        self.get_objects::<Problem>(params).await
    }
}
