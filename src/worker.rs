//! Background voice worker.
//!
//! Runs simulated transcription on its own thread so the caller stays
//! responsive, reporting progress over a channel.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::application::VoiceTriageService;
use crate::domain::VoiceAnalysis;
use crate::HeartguardError;

/// Progress updates from the voice worker.
#[derive(Debug, Clone)]
pub enum VoiceProgress {
    /// Audio received
    Listening,
    /// Transcription running
    Transcribing,
    Complete(VoiceAnalysis),
    Error(String),
}

impl VoiceProgress {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete(_) | Self::Error(_))
    }
}

/// Handle to a running voice worker.
pub struct VoiceWorkerHandle {
    pub progress_rx: Receiver<VoiceProgress>,
    handle: JoinHandle<()>,
}

impl VoiceWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<VoiceProgress> {
        self.progress_rx.try_recv().ok()
    }

    /// Block until the worker finishes and return its analysis.
    ///
    /// # Errors
    /// Returns `HeartguardError::Worker` if transcription failed, the thread
    /// panicked or no terminal update arrived.
    pub fn wait(self) -> crate::Result<VoiceAnalysis> {
        let mut last = None;
        for update in self.progress_rx.iter() {
            if update.is_terminal() {
                last = Some(update);
                break;
            }
        }
        if self.handle.join().is_err() {
            return Err(HeartguardError::Worker("Voice worker panicked".to_string()));
        }
        match last {
            Some(VoiceProgress::Complete(analysis)) => Ok(analysis),
            Some(VoiceProgress::Error(msg)) => Err(HeartguardError::Worker(msg)),
            _ => Err(HeartguardError::Worker(
                "Voice worker exited without a result".to_string(),
            )),
        }
    }
}

pub struct VoiceWorker;

impl VoiceWorker {
    /// Spawn a background transcription.
    pub fn spawn(service: Arc<VoiceTriageService>) -> VoiceWorkerHandle {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run_with_progress(&service, &tx);
        });

        VoiceWorkerHandle {
            progress_rx: rx,
            handle,
        }
    }

    fn run_with_progress(service: &VoiceTriageService, tx: &Sender<VoiceProgress>) {
        // A dropped receiver just means nobody is watching.
        let _ = tx.send(VoiceProgress::Listening);
        let _ = tx.send(VoiceProgress::Transcribing);

        let update = match service.transcribe() {
            Ok(analysis) => VoiceProgress::Complete(analysis),
            Err(e) => {
                tracing::warn!("Voice transcription failed: {}", e);
                VoiceProgress::Error(e.to_string())
            }
        };
        let _ = tx.send(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::VoiceConfig;

    fn service() -> Arc<VoiceTriageService> {
        Arc::new(VoiceTriageService::with_seed(VoiceConfig::immediate(), 21))
    }

    #[test]
    fn test_progress_sequence() {
        let handle = VoiceWorker::spawn(service());
        let updates: Vec<_> = handle.progress_rx.iter().collect();

        assert_eq!(updates.len(), 3);
        assert!(matches!(updates[0], VoiceProgress::Listening));
        assert!(matches!(updates[1], VoiceProgress::Transcribing));
        assert!(matches!(updates[2], VoiceProgress::Complete(_)));
    }

    #[test]
    fn test_wait_returns_result() {
        let analysis = VoiceWorker::spawn(service()).wait().expect("analysis");
        assert!(!analysis.transcript.is_empty());
    }

    #[test]
    fn test_shared_service_matches_direct_calls() {
        let shared = service();
        let direct = VoiceTriageService::with_seed(VoiceConfig::immediate(), 21);

        for _ in 0..3 {
            let via_worker = VoiceWorker::spawn(Arc::clone(&shared)).wait().expect("worker");
            assert_eq!(via_worker, direct.transcribe().expect("direct"));
        }
    }
    fn handle_sending(updates: Vec<VoiceProgress>) -> VoiceWorkerHandle {
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            for update in updates {
                let _ = tx.send(update);
            }
        });
        VoiceWorkerHandle {
            progress_rx: rx,
            handle,
        }
    }

    #[test]
    fn test_wait_maps_failures() {
        let failed = handle_sending(vec![
            VoiceProgress::Listening,
            VoiceProgress::Error("Voice RNG lock poisoned".to_string()),
        ]);
        match failed.wait() {
            Err(HeartguardError::Worker(msg)) => assert_eq!(msg, "Voice RNG lock poisoned"),
            other => panic!("unexpected result: {other:?}"),
        }

        let silent = handle_sending(vec![VoiceProgress::Listening]);
        assert!(matches!(silent.wait(), Err(HeartguardError::Worker(_))));
    }
}
