use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::brand::Preset;
use crate::error::AssetError;

pub const SETTINGS_FILE: &str = "assets.toml";

/// Configuração opcional lida de `config/assets.toml`.
/// Todos os campos têm default; o arquivo pode nem existir.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Raiz do projeto do app (onde ficam `assets/`, `ios/`, `android/`, `fastlane/`).
    pub root: PathBuf,
    pub image_api: ImageApiSettings,
    pub brand: BrandSettings,
    pub fonts: FontSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            image_api: ImageApiSettings::default(),
            brand: BrandSettings::default(),
            fonts: FontSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageApiSettings {
    pub endpoint: String,
    pub model: String,
    pub size: String,
    pub quality: String,
    pub background: String,
    pub timeout_secs: u64,
    /// Variável de ambiente (e chave nos arquivos .env) que guarda a API key.
    pub key_var: String,
    /// Arquivos .env de fallback, relativos à raiz do projeto.
    pub env_files: Vec<PathBuf>,
}

impl Default for ImageApiSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/images/generations".to_string(),
            model: "gpt-image-1".to_string(),
            size: "1024x1024".to_string(),
            quality: "high".to_string(),
            background: "opaque".to_string(),
            timeout_secs: 240,
            key_var: "OPENAI_API_KEY".to_string(),
            env_files: vec![
                PathBuf::from(".env"),
                PathBuf::from("../ProjectPlan2026/.env"),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrandSettings {
    pub preset: Preset,
}

/// Fontes extras, tentadas antes da lista embutida em `typography`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    pub regular: Vec<PathBuf>,
    pub bold: Vec<PathBuf>,
}

impl Settings {
    /// Raiz do projeto. Um `root` relativo é relativo ao projeto que contém
    /// o diretório de configuração, não ao diretório atual.
    pub fn project_root(&self, config_dir: &Path) -> PathBuf {
        if self.root.is_absolute() {
            return self.root.clone();
        }
        let base = config_dir.parent().unwrap_or(config_dir);
        base.join(&self.root)
    }
}

pub fn load_settings(config_dir: &Path) -> Result<Settings> {
    let path = config_dir.join(SETTINGS_FILE);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "sem arquivo de configuração, usando defaults");
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Não foi possível ler {}", path.display()))?;
    let settings: Settings =
        toml::from_str(&content).with_context(|| format!("Erro ao parsear {}", path.display()))?;
    Ok(settings)
}

/// Locale de loja: a mesma língua tem tags diferentes no iOS e no Android.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLocale {
    pub ios_tag: &'static str,
    pub android_tag: &'static str,
}

pub const LOCALE_EN: StoreLocale = StoreLocale {
    ios_tag: "en-US",
    android_tag: "en-US",
};

pub const LOCALE_ZH: StoreLocale = StoreLocale {
    ios_tag: "zh-Hans",
    android_tag: "zh-CN",
};

/// Árvore de diretórios fixa do projeto do app, derivada só da raiz.
#[derive(Debug, Clone)]
pub struct Layout {
    pub root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn store_assets_dir(&self) -> PathBuf {
        self.root.join("marketing").join("store-assets")
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.store_assets_dir().join("raw")
    }

    pub fn generated_dir(&self) -> PathBuf {
        self.store_assets_dir().join("generated")
    }

    pub fn logo_dir(&self) -> PathBuf {
        self.generated_dir().join("logo")
    }

    pub fn candidate_dir(&self) -> PathBuf {
        self.logo_dir().join("openai-icon-candidates")
    }

    pub fn app_assets_dir(&self) -> PathBuf {
        self.root.join("assets").join("images")
    }

    fn xcassets_dir(&self) -> PathBuf {
        self.root
            .join("ios")
            .join("AgentTown")
            .join("Images.xcassets")
    }

    pub fn ios_app_icon_path(&self) -> PathBuf {
        self.xcassets_dir()
            .join("AppIcon.appiconset")
            .join("App-Icon-1024x1024@1x.png")
    }

    pub fn ios_splash_legacy_dir(&self) -> PathBuf {
        self.xcassets_dir().join("SplashScreenLegacy.imageset")
    }

    pub fn android_res_dir(&self) -> PathBuf {
        self.root
            .join("android")
            .join("app")
            .join("src")
            .join("main")
            .join("res")
    }

    fn android_metadata_dir(&self) -> PathBuf {
        self.root.join("fastlane").join("metadata").join("android")
    }

    /// Feature graphic e ícone da listagem do Play.
    pub fn android_images_dir(&self) -> PathBuf {
        self.android_metadata_dir().join("images")
    }

    pub fn ios_screenshot_dir(&self, locale: StoreLocale) -> PathBuf {
        self.root
            .join("fastlane")
            .join("screenshots")
            .join(locale.ios_tag)
    }

    pub fn android_screenshot_dir(&self, locale: StoreLocale) -> PathBuf {
        self.android_metadata_dir()
            .join(locale.android_tag)
            .join("images")
            .join("phoneScreenshots")
    }
}

/// Procura `KEY=valor` num arquivo .env, removendo aspas.
pub fn read_key_from_env_file(path: &Path, var: &str) -> Option<String> {
    let bytes = std::fs::read(path).ok()?;
    let content = String::from_utf8_lossy(&bytes);
    let prefix = format!("{var}=");
    content
        .lines()
        .filter_map(|line| line.strip_prefix(&prefix))
        .map(|value| value.trim().trim_matches('"').trim_matches('\'').to_string())
        .find(|value| !value.is_empty())
}

/// Resolve a API key: argumento explícito, depois variável de ambiente,
/// depois os arquivos .env de fallback, nessa ordem.
pub fn resolve_api_key(
    explicit: Option<&str>,
    env_value: Option<String>,
    api: &ImageApiSettings,
    root: &Path,
) -> Result<String> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    if let Some(key) = env_value
        .map(|v| v.trim().to_string())
        .filter(|k| !k.is_empty())
    {
        return Ok(key);
    }

    for env_file in &api.env_files {
        let path = root.join(env_file);
        if let Some(key) = read_key_from_env_file(&path, &api.key_var) {
            tracing::debug!(path = %path.display(), "API key lida do arquivo .env");
            return Ok(key);
        }
    }

    Err(AssetError::CredentialMissing {
        var: api.key_var.clone(),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(dir.path()).unwrap();
        assert_eq!(settings.root, PathBuf::from("."));
        assert_eq!(settings.image_api.model, "gpt-image-1");
        assert_eq!(settings.image_api.timeout_secs, 240);
        assert_eq!(settings.brand.preset, Preset::Classic);
    }

    #[test]
    fn test_settings_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            "root = \"../app\"\n[image_api]\nquality = \"medium\"\n[brand]\npreset = \"aurora\"\n",
        )
        .unwrap();
        let settings = load_settings(dir.path()).unwrap();
        assert_eq!(settings.root, PathBuf::from("../app"));
        assert_eq!(settings.image_api.quality, "medium");
        assert_eq!(settings.image_api.size, "1024x1024");
        assert_eq!(settings.brand.preset, Preset::Aurora);
    }

    #[test]
    fn test_settings_invalid_toml_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "root = [").unwrap();
        assert!(load_settings(dir.path()).is_err());
    }

    #[test]
    fn test_relative_root_follows_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("proj").join("config");
        let mut settings = Settings::default();
        assert_eq!(
            settings.project_root(&config_dir),
            dir.path().join("proj").join(".")
        );

        settings.root = PathBuf::from("../app");
        assert_eq!(
            settings.project_root(&config_dir),
            dir.path().join("proj").join("../app")
        );

        settings.root = dir.path().join("abs");
        assert_eq!(settings.project_root(&config_dir), dir.path().join("abs"));

        // `config` relativo: raiz relativa ao diretório atual, como antes
        settings.root = PathBuf::from(".");
        assert_eq!(settings.project_root(Path::new("config")), PathBuf::from("."));
    }

    #[test]
    fn test_read_key_strips_quotes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "OTHER=1\nOPENAI_API_KEY=\"sk-abc\"\n").unwrap();
        assert_eq!(
            read_key_from_env_file(&path, "OPENAI_API_KEY"),
            Some("sk-abc".to_string())
        );
        assert_eq!(read_key_from_env_file(&path, "MISSING"), None);
        assert_eq!(
            read_key_from_env_file(&dir.path().join("nope"), "OPENAI_API_KEY"),
            None
        );
    }

    #[test]
    fn test_resolve_api_key_priority() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "OPENAI_API_KEY='from-file'\n").unwrap();
        let api = ImageApiSettings::default();

        let key = resolve_api_key(Some(" explicit "), Some("env".into()), &api, dir.path());
        assert_eq!(key.unwrap(), "explicit");

        let key = resolve_api_key(Some("  "), Some("env".into()), &api, dir.path());
        assert_eq!(key.unwrap(), "env");

        let key = resolve_api_key(None, Some(String::new()), &api, dir.path());
        assert_eq!(key.unwrap(), "from-file");
    }

    #[test]
    fn test_resolve_api_key_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_api_key(None, None, &ImageApiSettings::default(), dir.path())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssetError>(),
            Some(AssetError::CredentialMissing { .. })
        ));
    }

    #[test]
    fn test_layout_locale_dirs() {
        let layout = Layout::new("/app");
        assert_eq!(
            layout.ios_screenshot_dir(LOCALE_ZH),
            PathBuf::from("/app/fastlane/screenshots/zh-Hans")
        );
        assert_eq!(
            layout.android_screenshot_dir(LOCALE_ZH),
            PathBuf::from("/app/fastlane/metadata/android/zh-CN/images/phoneScreenshots")
        );
        assert_eq!(
            layout.candidate_dir(),
            PathBuf::from("/app/marketing/store-assets/generated/logo/openai-icon-candidates")
        );
    }
}
