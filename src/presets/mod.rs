use crate::core::questionnaire::Questionnaire;
use crate::core::score::{Question, ScoreError};

pub mod devops;
pub mod grooming;

pub trait Preset {
    fn name(&self) -> &'static str;
    fn title(&self) -> &'static str;
    fn questions(&self) -> Vec<Question>;

    fn questionnaire(&self) -> Result<Questionnaire, ScoreError> {
        Questionnaire::new(self.name(), self.title(), self.questions())
    }
}

pub fn all_presets() -> Vec<Box<dyn Preset>> {
    vec![
        Box::new(grooming::GroomingPreset),
        Box::new(devops::DevopsPreset),
    ]
}

pub fn find_preset(name: &str) -> Option<Box<dyn Preset>> {
    all_presets()
        .into_iter()
        .find(|preset| preset.name().eq_ignore_ascii_case(name))
}
