use kernel::error::app_error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Self-declared profession shown on a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Profession {
    Developer,
    Designer,
    FullstackDeveloper,
    FrontendDeveloper,
    BackendDeveloper,
    UxDesigner,
    UiDesigner,
    ProjectManager,
    ContentCreator,
    MarketingSpecialist,
    ProductManager,
}

impl Profession {
    pub const ALL: [Profession; 11] = [
        Profession::Developer,
        Profession::Designer,
        Profession::FullstackDeveloper,
        Profession::FrontendDeveloper,
        Profession::BackendDeveloper,
        Profession::UxDesigner,
        Profession::UiDesigner,
        Profession::ProjectManager,
        Profession::ContentCreator,
        Profession::MarketingSpecialist,
        Profession::ProductManager,
    ];

    pub const fn code(&self) -> &'static str {
        use Profession::*;
        match self {
            Developer => "developer",
            Designer => "designer",
            FullstackDeveloper => "fullstackDeveloper",
            FrontendDeveloper => "frontendDeveloper",
            BackendDeveloper => "backendDeveloper",
            UxDesigner => "uxDesigner",
            UiDesigner => "uiDesigner",
            ProjectManager => "projectManager",
            ContentCreator => "contentCreator",
            MarketingSpecialist => "marketingSpecialist",
            ProductManager => "productManager",
        }
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Profession {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.code() == s)
            .ok_or_else(|| AppError::bad_request(format!("Invalid profession: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_serde() {
        for profession in Profession::ALL {
            assert_eq!(
                serde_json::to_string(&profession).unwrap(),
                format!("\"{}\"", profession.code())
            );
            assert_eq!(profession.code().parse::<Profession>().unwrap(), profession);
        }
        assert!("FullstackDeveloper".parse::<Profession>().is_err());
    }
}
