use serde::{Serialize, Serializer};

/// How a provider usually encodes conversation creation time. Values are
/// decoded by their JSON type, so this only describes the expected form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampUnit {
    /// ISO-8601 date/time string.
    Iso8601,
    /// UNIX epoch seconds, fractional allowed.
    EpochSeconds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampRule {
    /// Record field holding the creation time.
    pub field: &'static str,
    pub unit: TimestampUnit,
}

#[derive(Debug, Clone)]
pub struct ProviderDef {
    pub id: &'static str,
    pub name: &'static str,
    pub disabled: bool,
    pub rule: Option<TimestampRule>,
    /// Settings menu path that produces the export file.
    pub export_path: &'static [&'static str],
}

/// Registry entry as shown to a user picking a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderDescriptor {
    pub name: &'static str,
    pub value: Provider,
    pub disabled: bool,
}

const fn has_rule(rule: Option<TimestampRule>) -> bool {
    rule.is_some()
}

macro_rules! define_providers {
    ( $( $variant:ident = $index:expr => { id: $id:expr, name: $name:expr, disabled: $disabled:expr, rule: $rule:expr, export_path: $path:expr } ),+ $(,)? ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(usize)]
        pub enum Provider {
            $( $variant = $index ),+
        }

        impl Provider {
            pub const COUNT: usize = [ $( $index ),+ ].len();
            pub const ALL: [Provider; Self::COUNT] = [ $( Provider::$variant ),+ ];

            pub fn data(&self) -> &'static ProviderDef {
                &PROVIDERS[*self as usize]
            }

            pub fn as_str(&self) -> &'static str {
                self.data().id
            }

            pub fn display_name(&self) -> &'static str {
                self.data().name
            }

            pub fn is_disabled(&self) -> bool {
                self.data().disabled
            }

            pub fn timestamp_rule(&self) -> Option<TimestampRule> {
                self.data().rule
            }

            pub fn export_path(&self) -> &'static [&'static str] {
                self.data().export_path
            }

            pub fn descriptor(&self) -> ProviderDescriptor {
                ProviderDescriptor {
                    name: self.display_name(),
                    value: *self,
                    disabled: self.is_disabled(),
                }
            }

            pub fn iter() -> impl Iterator<Item = Provider> {
                Self::ALL.iter().copied()
            }

            /// Providers that may be chosen for processing.
            pub fn selectable() -> impl Iterator<Item = Provider> {
                Self::iter().filter(|p| !p.is_disabled())
            }

            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Option<Provider> {
                Self::ALL.iter().copied().find(|p| p.as_str() == s)
            }
        }

        pub const PROVIDERS: [ProviderDef; Provider::COUNT] = [
            $( ProviderDef {
                id: $id,
                name: $name,
                disabled: $disabled,
                rule: $rule,
                export_path: $path,
            } ),+
        ];

        const _: () = {
            let mut i = 0;
            $(
                assert!($index == i, "Provider indices must be sequential");
                assert!(
                    $disabled != has_rule($rule),
                    "enabled providers need a timestamp rule, disabled ones must not have one"
                );
                i += 1;
                let _ = i;
            )+
        };
    };
}

define_providers!(
    Claude = 0 => {
        id: "claude",
        name: "Claude",
        disabled: false,
        rule: Some(TimestampRule {
            field: "created_at",
            unit: TimestampUnit::Iso8601,
        }),
        export_path: &["Claude Settings", "Account", "Export Data"]
    },
    ChatGpt = 1 => {
        id: "chatgpt",
        name: "ChatGPT",
        disabled: false,
        rule: Some(TimestampRule {
            field: "create_time",
            unit: TimestampUnit::EpochSeconds,
        }),
        export_path: &["ChatGPT Settings", "Data controls", "Export"]
    },
    MistralAi = 2 => {
        id: "mistral",
        name: "MistralAI",
        disabled: true,
        rule: None,
        export_path: &[]
    },
    Gemini = 3 => {
        id: "gemini",
        name: "Gemini",
        disabled: true,
        rule: None,
        export_path: &[]
    }
);

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Serialize for Provider {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
