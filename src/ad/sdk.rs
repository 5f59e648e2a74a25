//! Adapter for the ad provider SDK.
//!
//! The provider ships its SDK as a shared library exporting one function per
//! ad zone, `show_<zone>`, with the C signature `int show(void)`. A return
//! value of `0` means the ad was watched.

use super::detect::SdkProbe;
use super::{AdError, AdMode, AdPlayback, AdPresenter};
use libloading::{Library, Symbol};
use std::os::raw::c_int;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::Poll;
use std::time::{Duration, Instant};

type ShowFn = unsafe extern "C" fn() -> c_int;

/// A loaded copy of the SDK library.
#[derive(Debug)]
pub struct SdkLibrary {
    lib: Library,
}

impl SdkLibrary {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        // SAFETY: loading runs the library's initialisers; the SDK is a
        // provider-supplied library configured by the operator.
        let lib = unsafe { Library::new(path.as_ref())? };
        Ok(Self { lib })
    }

    pub fn has_symbol(&self, name: &str) -> bool {
        self.show_fn(name).is_ok()
    }

    fn show_fn(&self, name: &str) -> Result<ShowFn, libloading::Error> {
        // SAFETY: the provider documents `show_<zone>` as `int show(void)`.
        unsafe {
            let symbol: Symbol<'_, ShowFn> = self.lib.get(name.as_bytes())?;
            Ok(*symbol)
        }
    }
}

/// Shared slot holding the currently loaded SDK, if any.
#[derive(Debug, Clone, Default)]
pub struct SdkSlot {
    inner: Arc<Mutex<Option<Arc<SdkLibrary>>>>,
}

impl SdkSlot {
    fn lock(&self) -> MutexGuard<'_, Option<Arc<SdkLibrary>>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self) -> Option<Arc<SdkLibrary>> {
        self.lock().clone()
    }

    pub fn set(&self, lib: Option<SdkLibrary>) {
        *self.lock() = lib.map(Arc::new);
    }
}

/// Loads the SDK library in the background, like a script tag that finishes
/// some time after the page is up.
#[derive(Debug, Clone)]
pub struct SdkLoader {
    slot: SdkSlot,
    library: PathBuf,
}

impl SdkLoader {
    pub fn new(slot: SdkSlot, library: impl Into<PathBuf>) -> Self {
        Self {
            slot,
            library: library.into(),
        }
    }

    /// Load the library from disk on a background thread.
    pub fn spawn_load(&self) {
        let slot = self.slot.clone();
        let path = self.library.clone();
        let spawned = std::thread::Builder::new()
            .name("sdk-loader".into())
            .spawn(move || load_into(&slot, &path));
        if let Err(e) = spawned {
            tracing::error!("failed to start SDK loader: {e}");
        }
    }

    /// Download the SDK from `url`, replace the local copy and load it again.
    pub fn spawn_reload(&self, url: String) {
        let slot = self.slot.clone();
        let path = self.library.clone();
        let spawned = std::thread::Builder::new()
            .name("sdk-reload".into())
            .spawn(move || {
                slot.set(None);
                match download(&url, &path) {
                    Ok(()) => tracing::info!("downloaded SDK from {url}"),
                    Err(e) => tracing::warn!("SDK download from {url} failed: {e}"),
                }
                load_into(&slot, &path);
            });
        if let Err(e) = spawned {
            tracing::error!("failed to start SDK reload: {e}");
        }
    }
}

fn load_into(slot: &SdkSlot, path: &Path) {
    match SdkLibrary::open(path) {
        Ok(lib) => {
            tracing::info!("ad SDK loaded from {}", path.display());
            slot.set(Some(lib));
        }
        Err(e) => tracing::warn!("ad SDK not loaded from {}: {e}", path.display()),
    }
}

fn download(url: &str, path: &Path) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    let bytes = client.get(url).send()?.error_for_status()?.bytes()?;
    replace_file(path, &bytes)
}

/// Write `bytes` next to `path` and rename over it. A copy still mapped by an
/// earlier load keeps its old inode instead of being truncated in place.
pub fn replace_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut staging = path.as_os_str().to_owned();
    staging.push(".download");
    let staging = PathBuf::from(staging);
    std::fs::write(&staging, bytes)?;
    if let Err(e) = std::fs::rename(&staging, path) {
        let _ = std::fs::remove_file(&staging);
        return Err(e.into());
    }
    Ok(())
}

/// Checks whether `url` points at `domain` or one of its subdomains.
pub fn is_provider_url(url: &str, domain: &str) -> bool {
    let Ok(parsed) = url::Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    let domain = domain.trim().trim_start_matches('.').to_ascii_lowercase();
    !domain.is_empty() && (host == domain || host.ends_with(&format!(".{domain}")))
}

/// [`SdkProbe`] backed by the configured SDK reference and the loaded library.
#[derive(Debug, Clone)]
pub struct LibrarySdkProbe {
    slot: SdkSlot,
    url: String,
    provider_domain: String,
    symbol: String,
}

impl LibrarySdkProbe {
    pub fn new(slot: SdkSlot, url: &str, provider_domain: &str, symbol: &str) -> Self {
        Self {
            slot,
            url: url.into(),
            provider_domain: provider_domain.into(),
            symbol: symbol.into(),
        }
    }
}

impl SdkProbe for LibrarySdkProbe {
    fn script_referenced(&self) -> bool {
        is_provider_url(&self.url, &self.provider_domain)
    }

    fn callable_present(&self) -> bool {
        self.slot
            .get()
            .is_some_and(|lib| lib.has_symbol(&self.symbol))
    }

    fn callable_name(&self) -> &str {
        &self.symbol
    }
}

/// Real provider strategy: calls `show_<zone>` on a worker thread.
#[derive(Debug, Clone)]
pub struct SdkPresenter {
    slot: SdkSlot,
    symbol: String,
}

impl SdkPresenter {
    pub fn new(slot: SdkSlot, symbol: impl Into<String>) -> Self {
        Self {
            slot,
            symbol: symbol.into(),
        }
    }
}

impl AdPresenter for SdkPresenter {
    fn mode(&self) -> AdMode {
        AdMode::Sdk
    }

    fn attempt_play(&mut self, _now: Instant) -> Result<Box<dyn AdPlayback>, AdError> {
        let lib = self.slot.get().ok_or(AdError::Unavailable)?;
        let show = lib
            .show_fn(&self.symbol)
            .map_err(|e| AdError::Invocation(e.to_string()))?;
        let (tx, rx) = channel();
        tracing::info!("calling {}() from SDK", self.symbol);
        std::thread::Builder::new()
            .name("sdk-show".into())
            .spawn(move || {
                // Keeps the library mapped while the call runs.
                let _lib = lib;
                // SAFETY: `show` was resolved from `_lib`, which outlives the call.
                let code = unsafe { show() };
                let result = if code == 0 {
                    Ok(())
                } else {
                    Err(AdError::Rejected(code))
                };
                let _ = tx.send(result);
            })
            .map_err(|e| AdError::Invocation(e.to_string()))?;
        Ok(Box::new(ThreadPlayback { rx }))
    }
}

/// Result of a call running on another thread.
pub struct ThreadPlayback {
    rx: Receiver<Result<(), AdError>>,
}

impl ThreadPlayback {
    pub fn new(rx: Receiver<Result<(), AdError>>) -> Self {
        Self { rx }
    }
}

impl AdPlayback for ThreadPlayback {
    fn poll(&mut self, _now: Instant) -> Poll<Result<(), AdError>> {
        match self.rx.try_recv() {
            Ok(result) => Poll::Ready(result),
            Err(TryRecvError::Empty) => Poll::Pending,
            Err(TryRecvError::Disconnected) => Poll::Ready(Err(AdError::WorkerLost)),
        }
    }
}
