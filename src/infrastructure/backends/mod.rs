pub mod answer;
mod http;
pub mod stream;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::BackendBox;
use crate::domain::models::BackendName;

pub struct BackendManager {}

impl BackendManager {
    pub fn get(name: &str) -> Result<BackendBox> {
        match BackendName::parse(name) {
            Some(BackendName::Stream) => {
                return Ok(Box::<stream::StreamChat>::default());
            }
            Some(BackendName::Answer) => {
                return Ok(Box::<answer::AnswerChat>::default());
            }
            None => {
                bail!(format!("No backend implemented for {name}"));
            }
        }
    }
}
