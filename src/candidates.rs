use anyhow::{Context, Result};
use base64::Engine as _;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use crate::config::ImageApiSettings;
use crate::error::AssetError;

pub const DEFAULT_PROMPT: &str = "Design a world-class mobile app icon for AgentTown. \
Theme: AI agent world map plus chat. \
Visual direction: premium, elegant, futuristic, minimal, high-end startup aesthetic. \
Use deep navy and subtle indigo background gradients with vivid neon green accents. \
Main symbol: a clean stylized globe merged with a chat bubble metaphor, instantly recognizable at tiny sizes. \
Composition: centered, balanced, strong silhouette, smooth geometry, crisp edges. \
Lighting: soft cinematic glow, subtle glass depth, no clutter. \
No text, no letters, no watermark, no border frame, no photorealism, no busy details. \
Output must be square app icon artwork on an opaque background.";

/// Corpo JSON do POST de geração.
#[derive(Debug, Serialize)]
pub struct GenerationRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub size: &'a str,
    pub quality: &'a str,
    pub background: &'a str,
    pub n: u32,
}

impl<'a> GenerationRequest<'a> {
    pub fn new(api: &'a ImageApiSettings, prompt: &'a str, count: u32) -> Self {
        Self {
            model: &api.model,
            prompt,
            size: &api.size,
            quality: &api.quality,
            background: &api.background,
            n: count.max(1),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    b64_json: Option<String>,
}

fn candidate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^candidate-(\d+)\.png$").expect("regex de candidato inválida")
    })
}

pub fn candidate_file_name(index: usize) -> String {
    format!("candidate-{index}.png")
}

/// Índice de um arquivo `candidate-<n>.png`.
pub fn candidate_index(path: &Path) -> Option<usize> {
    let name = path.file_name()?.to_str()?;
    candidate_pattern()
        .captures(name)
        .and_then(|c| c[1].parse().ok())
}

/// Extrai as imagens utilizáveis da resposta. Itens sem payload ou com
/// base64 inválido são ignorados.
pub fn decode_images(body: &[u8]) -> Result<Vec<Vec<u8>>> {
    let response: GenerationResponse =
        serde_json::from_slice(body).context("Falha ao parsear resposta da OpenAI Images API")?;

    let engine = base64::engine::general_purpose::STANDARD;
    let images = response
        .data
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let b64 = item.b64_json.filter(|s| !s.is_empty())?;
            match engine.decode(b64.trim()) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    tracing::warn!(item = i, "payload base64 inválido ignorado: {e}");
                    None
                }
            }
        })
        .collect();
    Ok(images)
}

/// Uma única chamada à API; devolve os PNGs decodificados.
pub async fn request_images(
    api: &ImageApiSettings,
    api_key: &str,
    prompt: &str,
    count: u32,
) -> Result<Vec<Vec<u8>>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(api.timeout_secs))
        .build()
        .context("Falha ao criar cliente HTTP")?;

    let payload = GenerationRequest::new(api, prompt, count);
    tracing::info!(model = payload.model, n = payload.n, "solicitando candidatos");

    let response = client
        .post(&api.endpoint)
        .bearer_auth(api_key)
        .json(&payload)
        .send()
        .await
        .with_context(|| format!("Falha na requisição para {}", api.endpoint))?;

    let status = response.status();
    let body = response
        .bytes()
        .await
        .context("Falha ao ler resposta da OpenAI Images API")?;

    if !status.is_success() {
        return Err(AssetError::RequestFailure {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        }
        .into());
    }

    decode_images(&body)
}

/// Substitui o conjunto de candidatos: apaga os antigos e grava
/// `candidate-1.png..candidate-N.png`. Sem imagens, nada é apagado.
pub fn store_candidates(dir: &Path, images: &[Vec<u8>]) -> Result<Vec<PathBuf>> {
    if images.is_empty() {
        return Err(AssetError::EmptyResult.into());
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Não foi possível criar diretório: {}", dir.display()))?;

    for old in existing_candidates(dir)? {
        std::fs::remove_file(&old)
            .with_context(|| format!("Não foi possível remover {}", old.display()))?;
    }

    let mut paths = Vec::with_capacity(images.len());
    for (i, bytes) in images.iter().enumerate() {
        let path = dir.join(candidate_file_name(i + 1));
        std::fs::write(&path, bytes)
            .with_context(|| format!("Falha ao salvar candidato: {}", path.display()))?;
        paths.push(path);
    }

    tracing::info!(count = paths.len(), dir = %dir.display(), "candidatos salvos");
    Ok(paths)
}

/// Candidatos existentes, em ordem numérica do índice.
pub fn existing_candidates(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Não foi possível listar {}", dir.display()))?;

    let mut found = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Não foi possível listar {}", dir.display()))?
            .path();
        if let Some(index) = candidate_index(&path) {
            found.push((index, path));
        }
    }
    found.sort();
    Ok(found.into_iter().map(|(_, p)| p).collect())
}

/// `pick` (1-based) precisa apontar para um de `count` candidatos.
pub fn check_pick(pick: usize, count: usize) -> Result<()> {
    if pick == 0 || pick > count {
        return Err(AssetError::SelectionOutOfRange { pick, count }.into());
    }
    Ok(())
}

/// Como `store_candidates`, mas só substitui o conjunto antigo se `pick`
/// couber nas imagens utilizáveis recebidas.
pub fn store_candidates_for_pick(dir: &Path, images: &[Vec<u8>], pick: usize) -> Result<Vec<PathBuf>> {
    if images.is_empty() {
        return Err(AssetError::EmptyResult.into());
    }
    check_pick(pick, images.len())?;
    store_candidates(dir, images)
}

/// Escolhe o candidato pelo índice 1-based.
pub fn select_candidate(candidates: &[PathBuf], pick: usize) -> Result<&Path> {
    check_pick(pick, candidates.len())?;
    Ok(&candidates[pick - 1])
}
