//! Closed vocabularies of the GameNative container dump.
//!
//! A dump line is only meaningful if it matches one of two fixed sets exactly
//! (case-sensitive): the [`RecognizedKey`] set of container settings, or the
//! [`ButtonKey`] set of controller buttons. Anything else is an unknown key.

/// How a raw value line is turned into a JSON value for a given key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionPolicy {
    /// Trimmed string, never inferred (versions and identifiers)
    StringOnly,
    /// Trimmed, then parsed as embedded JSON; empty, `null` or malformed become `null`
    Json,
    /// All whitespace removed (drive mappings)
    StripWhitespace,
    /// Boolean, then numeric, then string inference
    Infer,
}

macro_rules! recognized_keys {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// A container setting name that may appear as a key line in a dump.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum RecognizedKey {
            $($variant),+
        }

        impl RecognizedKey {
            /// Every recognized key, in vocabulary order.
            pub const ALL: &'static [RecognizedKey] = &[$(RecognizedKey::$variant),+];

            /// The exact line text of this key.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(RecognizedKey::$variant => $name),+
                }
            }

            /// Match a trimmed line against the vocabulary.
            pub fn from_line(line: &str) -> Option<Self> {
                match line {
                    $($name => Some(RecognizedKey::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

recognized_keys! {
    Id => "id",
    Name => "name",
    Drives => "drives",
    LcAll => "lc all",
    CpuList => "cpuList",
    EnvVars => "envVars",
    ShowFps => "showFPS",
    UseDri3 => "useDRI3",
    Emulator => "emulator",
    ExecArgs => "execArgs",
    ForceDlc => "forceDlc",
    Language => "language",
    RcfileId => "rcfileId",
    Dxwrapper => "dxwrapper",
    ExtraData => "extraData",
    ProfileId => "profileId",
    AppVersion => "appVersion",
    ImgVersion => "imgVersion",
    AudioDriver => "audioDriver",
    Box64Version => "box64Version",
    DesktopTheme => "desktopTheme",
    Wincomponents => "wincomponents",
    ConfigChanged => "config changed",
    FexcoreVersion => "fexcoreVersion",
    GraphicsDriver => "graphicsDriver",
    SharpnessLevel => "sharpnessLevel",
    SharpnessEffect => "sharpnessEffect",
    SharpnessDenoise => "sharpnessDenoise",
    StartupSelection => "startupSelection",
    GraphicsDriverAdreno => "graphicsDriverAdreno",
    LastInstalledMainWrapper => "lastInstalledMainWrapper",
    DiscordSupportPromptShown => "discord support prompt shown",
    InputType => "inputType",
    SteamType => "steamType",
    Wow64Mode => "wow64Mode",
    ScreenSize => "screenSize",
    Box64Preset => "box64Preset",
    Box86Preset => "box86Preset",
    InstallPath => "installPath",
    WineVersion => "wineVersion",
    Box86Version => "box86Version",
    CpuListWow64 => "cpuListWoW64",
    UseLegacyDrm => "useLegacyDRM",
    FexcorePreset => "fexcorePreset",
    MidiSoundFont => "midiSoundFont",
    ExecutablePath => "executablePath",
    NeedsUnpacking => "needsUnpacking",
    DxwrapperConfig => "dxwrapperConfig",
    LaunchRealSteam => "launchRealSteam",
    SessionMetadata => "sessionMetadata",
    AvgFps => "avg fps",
    SessionLengthSec => "session length sec",
    TouchscreenMode => "touchscreenMode",
    ContainerVariant => "containerVariant",
    DinputMapperType => "dinputMapperType",
    SdlControllerApi => "sdlControllerAPI",
    AllowSteamUpdates => "allowSteamUpdates",
    ControllerMapping => "controllerMapping",
    DisableMouseInput => "disableMouseInput",
    PrimaryController => "primaryController",
    EmulateKeyboardMouse => "emulateKeyboardMouse",
    GraphicsDriverConfig => "graphicsDriverConfig",
    GraphicsDriverVersion => "graphicsDriverVersion",
    ControllerEmulationBindings => "controllerEmulationBindings",
}

impl RecognizedKey {
    /// Session and bookkeeping keys whose value line is consumed but never emitted.
    pub fn is_excluded(self) -> bool {
        matches!(
            self,
            RecognizedKey::AvgFps
                | RecognizedKey::SessionLengthSec
                | RecognizedKey::AppVersion
                | RecognizedKey::ImgVersion
                | RecognizedKey::ConfigChanged
                | RecognizedKey::DiscordSupportPromptShown
                | RecognizedKey::ProfileId
        )
    }

    /// Name used in the structured config (`lc all` becomes `lc_all`).
    pub fn output_name(self) -> &'static str {
        match self {
            RecognizedKey::LcAll => "lc_all",
            other => other.as_str(),
        }
    }

    pub fn policy(self) -> CoercionPolicy {
        match self {
            RecognizedKey::Drives => CoercionPolicy::StripWhitespace,
            RecognizedKey::ExtraData | RecognizedKey::SessionMetadata => CoercionPolicy::Json,
            RecognizedKey::WineVersion
            | RecognizedKey::Box86Version
            | RecognizedKey::Box64Version
            | RecognizedKey::FexcoreVersion
            | RecognizedKey::GraphicsDriverVersion
            | RecognizedKey::GraphicsDriverConfig
            | RecognizedKey::DxwrapperConfig
            | RecognizedKey::Id => CoercionPolicy::StringOnly,
            _ => CoercionPolicy::Infer,
        }
    }
}

/// A controller button line, bound into `controllerEmulationBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonKey {
    A,
    B,
    X,
    Y,
    L1,
    R1,
    Select,
    Start,
    Menu,
    L2,
    R2,
    L3,
    R3,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

impl ButtonKey {
    /// Every button, ordered by binding index.
    pub const ALL: &'static [ButtonKey] = &[
        ButtonKey::A,
        ButtonKey::B,
        ButtonKey::X,
        ButtonKey::Y,
        ButtonKey::L1,
        ButtonKey::R1,
        ButtonKey::Select,
        ButtonKey::Start,
        ButtonKey::Menu,
        ButtonKey::L2,
        ButtonKey::R2,
        ButtonKey::L3,
        ButtonKey::R3,
        ButtonKey::DpadUp,
        ButtonKey::DpadDown,
        ButtonKey::DpadLeft,
        ButtonKey::DpadRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ButtonKey::A => "A",
            ButtonKey::B => "B",
            ButtonKey::X => "X",
            ButtonKey::Y => "Y",
            ButtonKey::L1 => "L1",
            ButtonKey::R1 => "R1",
            ButtonKey::Select => "SELECT",
            ButtonKey::Start => "START",
            ButtonKey::Menu => "MENU",
            ButtonKey::L2 => "L2",
            ButtonKey::R2 => "R2",
            ButtonKey::L3 => "L3",
            ButtonKey::R3 => "R3",
            ButtonKey::DpadUp => "DPAD UP",
            ButtonKey::DpadDown => "DPAD DOWN",
            ButtonKey::DpadLeft => "DPAD LEFT",
            ButtonKey::DpadRight => "DPAD RIGHT",
        }
    }

    pub fn from_line(line: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|button| button.as_str() == line)
    }

    /// Binding slot as stored in the config: `"0"` for `A` through `"16"` for `DPAD RIGHT`.
    pub fn index(self) -> &'static str {
        match self {
            ButtonKey::A => "0",
            ButtonKey::B => "1",
            ButtonKey::X => "2",
            ButtonKey::Y => "3",
            ButtonKey::L1 => "4",
            ButtonKey::R1 => "5",
            ButtonKey::Select => "6",
            ButtonKey::Start => "7",
            ButtonKey::Menu => "8",
            ButtonKey::L2 => "9",
            ButtonKey::R2 => "10",
            ButtonKey::L3 => "11",
            ButtonKey::R3 => "12",
            ButtonKey::DpadUp => "13",
            ButtonKey::DpadDown => "14",
            ButtonKey::DpadLeft => "15",
            ButtonKey::DpadRight => "16",
        }
    }
}

/// Classification of one non-blank dump line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Button(ButtonKey),
    Key(RecognizedKey),
    Unrecognized,
}

impl LineKind {
    /// Buttons are checked first; the two vocabularies are disjoint.
    pub fn classify(line: &str) -> Self {
        if let Some(button) = ButtonKey::from_line(line) {
            LineKind::Button(button)
        } else if let Some(key) = RecognizedKey::from_line(line) {
            LineKind::Key(key)
        } else {
            LineKind::Unrecognized
        }
    }

    /// True when the line is a name in either vocabulary.
    pub fn is_vocabulary(self) -> bool {
        !matches!(self, LineKind::Unrecognized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_vocabulary_sizes() {
        assert_eq!(RecognizedKey::ALL.len(), 64);
        assert_eq!(ButtonKey::ALL.len(), 17);
    }

    #[test]
    fn test_recognized_key_round_trip() {
        for key in RecognizedKey::ALL {
            assert_eq!(RecognizedKey::from_line(key.as_str()), Some(*key));
        }
    }

    #[test]
    fn test_vocabularies_are_disjoint() {
        let keys: HashSet<&str> = RecognizedKey::ALL.iter().map(|k| k.as_str()).collect();
        for button in ButtonKey::ALL {
            assert!(!keys.contains(button.as_str()));
        }
    }

    #[test]
    fn test_button_indices_are_sequential() {
        for (i, button) in ButtonKey::ALL.iter().enumerate() {
            assert_eq!(button.index(), i.to_string());
            assert_eq!(ButtonKey::from_line(button.as_str()), Some(*button));
        }
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert_eq!(RecognizedKey::from_line("WineVersion"), None);
        assert_eq!(ButtonKey::from_line("dpad up"), None);
        assert_eq!(LineKind::classify("showfps"), LineKind::Unrecognized);
    }

    #[test]
    fn test_excluded_keys() {
        let excluded: Vec<&str> = RecognizedKey::ALL
            .iter()
            .filter(|k| k.is_excluded())
            .map(|k| k.as_str())
            .collect();
        assert_eq!(
            excluded,
            vec![
                "profileId",
                "appVersion",
                "imgVersion",
                "config changed",
                "discord support prompt shown",
                "avg fps",
                "session length sec",
            ]
        );
    }

    #[test]
    fn test_policies() {
        assert_eq!(RecognizedKey::Drives.policy(), CoercionPolicy::StripWhitespace);
        assert_eq!(RecognizedKey::ExtraData.policy(), CoercionPolicy::Json);
        assert_eq!(RecognizedKey::SessionMetadata.policy(), CoercionPolicy::Json);
        assert_eq!(RecognizedKey::WineVersion.policy(), CoercionPolicy::StringOnly);
        assert_eq!(RecognizedKey::Id.policy(), CoercionPolicy::StringOnly);
        assert_eq!(RecognizedKey::ShowFps.policy(), CoercionPolicy::Infer);
    }

    #[test]
    fn test_lc_all_rename() {
        assert_eq!(RecognizedKey::LcAll.output_name(), "lc_all");
        assert_eq!(RecognizedKey::Name.output_name(), "name");
    }
}
