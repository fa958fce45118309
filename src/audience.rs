use std::fmt;
use std::str::FromStr;

use crate::error::OAuthError;

/// Audience string for CONSOLE grants; also the fixed audience of the
/// Console credential set.
pub const CONSOLE_AUDIENCE: &str = "api.cloud.camunda.io";

/// Symbolic name of a token-grant audience.
///
/// Each audience maps to the audience string the token endpoint expects;
/// ZEEBE is deployment specific and resolves to a configured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Audience {
    Operate,
    Zeebe,
    Optimize,
    Tasklist,
    Console,
}

impl Audience {
    pub const ALL: [Audience; 5] = [
        Audience::Operate,
        Audience::Zeebe,
        Audience::Optimize,
        Audience::Tasklist,
        Audience::Console,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Audience::Operate => "OPERATE",
            Audience::Zeebe => "ZEEBE",
            Audience::Optimize => "OPTIMIZE",
            Audience::Tasklist => "TASKLIST",
            Audience::Console => "CONSOLE",
        }
    }

    /// Audience string sent to the token endpoint.
    pub fn resolve<'a>(&self, zeebe_audience: &'a str) -> &'a str {
        match self {
            Audience::Operate => "operate.camunda.io",
            Audience::Zeebe => zeebe_audience,
            Audience::Optimize => "optimize.camunda.io",
            Audience::Tasklist => "tasklist.camunda.io",
            Audience::Console => CONSOLE_AUDIENCE,
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Audience {
    type Err = OAuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPERATE" => Ok(Audience::Operate),
            "ZEEBE" => Ok(Audience::Zeebe),
            "OPTIMIZE" => Ok(Audience::Optimize),
            "TASKLIST" => Ok(Audience::Tasklist),
            "CONSOLE" => Ok(Audience::Console),
            other => Err(OAuthError::UnknownAudience(other.to_owned())),
        }
    }
}
