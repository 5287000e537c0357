// crates/clipscout-media/src/worker.rs
//
// MediaWorker: owns the frame-request slot and playback decode thread.
// All public API that clipscout-ui calls lives here.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, Condvar, atomic::{AtomicBool, Ordering}};
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use uuid::Uuid;

use clipscout_core::media_types::{MediaResult, PlaybackFrame};

use crate::decode::LiveDecoder;
use crate::probe::{probe_duration, probe_video_size_and_thumbnail};

// ── Internal types ────────────────────────────────────────────────────────────

struct FrameRequest {
    id:        Uuid,
    path:      PathBuf,
    timestamp: f64,
    aspect:    f32,
}

enum PlaybackCmd {
    Start { id: Uuid, path: PathBuf, ts: f64, aspect: f32 },
    Stop,
}

// ── MediaWorker ───────────────────────────────────────────────────────────────

pub struct MediaWorker {
    /// Shared result channel: probe results (duration, size, thumbnail, errors).
    pub rx:    Receiver<MediaResult>,
    tx:        Sender<MediaResult>,

    /// Dedicated channel for on-demand scrub VideoFrame results.
    ///
    /// Probing a freshly selected clip (thumbnail decode in particular) can
    /// take a moment, and that is exactly when the user starts dragging the
    /// seek bar. A separate channel keeps scrub frames from queueing behind
    /// probe traffic; the UI drains it first.
    pub scrub_rx: Receiver<MediaResult>,
    scrub_tx:     Sender<MediaResult>,

    /// Latest-wins slot for on-demand scrub frames.
    frame_req: Arc<(Mutex<Option<FrameRequest>>, Condvar)>,
    /// Dedicated playback pipeline.
    pb_tx:     Sender<PlaybackCmd>,
    pub pb_rx: Receiver<PlaybackFrame>,
    shutdown:  Arc<AtomicBool>,
}

impl MediaWorker {
    pub fn new() -> Self {
        let (tx, rx)             = bounded(64);
        let (scrub_tx, scrub_rx) = bounded(8);

        let frame_req: Arc<(Mutex<Option<FrameRequest>>, Condvar)> =
            Arc::new((Mutex::new(None), Condvar::new()));

        // ── Scrub frame decode thread ─────────────────────────────────────────
        // Blocks on the latest-wins slot; reuses the LiveDecoder when possible.
        let scrub_result_tx = scrub_tx.clone();
        let slot            = Arc::clone(&frame_req);
        thread::spawn(move || {
            let mut live: Option<LiveDecoder> = None;
            loop {
                let req = {
                    let (lock, cvar) = &*slot;
                    let mut guard = lock.lock().unwrap();
                    while guard.is_none() {
                        guard = cvar.wait(guard).unwrap();
                    }
                    guard.take().unwrap()
                };

                // Poison-pill: a request with a nil id signals shutdown.
                if req.id == Uuid::nil() { return; }

                // Reset (re-open + seek to keyframe) when:
                //   a) different file
                //   b) any backward movement — advance_to() can only go forward
                //   c) forward jump > 2 s — advance_to() would decode dozens of
                //      frames and block the thread; re-open is instant
                let needs_reset = live.as_ref().map(|d| {
                    let tpts     = d.ts_to_pts(req.timestamp);
                    let two_secs = d.ts_to_pts(2.0);
                    d.path != req.path
                        || tpts <= d.last_pts
                        || tpts > d.last_pts + two_secs
                }).unwrap_or(true);

                if needs_reset {
                    match LiveDecoder::open(&req.path, req.timestamp, req.aspect) {
                        Ok(mut d) => {
                            // Burn decode-only through the GOP so the frame we
                            // send is at req.timestamp, not the keyframe.
                            d.skip_until_pts = d.ts_to_pts(req.timestamp);
                            if let Some((data, w, h, _)) = d.next_frame() {
                                let _ = scrub_result_tx.send(MediaResult::VideoFrame {
                                    id: req.id, width: w, height: h, data,
                                });
                            }
                            live = Some(d);
                        }
                        Err(e) => eprintln!("[media] LiveDecoder::open: {e}"),
                    }
                } else if let Some(d) = &mut live {
                    let tpts = d.ts_to_pts(req.timestamp);
                    if let Some((data, w, h)) = d.advance_to(tpts) {
                        let _ = scrub_result_tx.send(MediaResult::VideoFrame {
                            id: req.id, width: w, height: h, data,
                        });
                    }
                }
            }
        });

        // ── Dedicated playback decode thread ──────────────────────────────────
        // Runs continuously ahead of the UI filling a bounded channel; send()
        // blocking on the full channel IS the rate limiter.
        let (pb_tx, pb_cmd_rx)   = bounded::<PlaybackCmd>(4);
        let (pb_frame_tx, pb_rx) = bounded::<PlaybackFrame>(32);

        thread::spawn(move || {
            let mut decoder: Option<(Uuid, LiveDecoder)> = None;
            loop {
                if let Some((id, ref mut d)) = decoder {
                    match pb_cmd_rx.try_recv() {
                        Ok(PlaybackCmd::Start { id: new_id, path, ts, aspect }) => {
                            match LiveDecoder::open(&path, ts, aspect) {
                                Ok(mut nd) => {
                                    // burn_to_pts runs synchronously before we
                                    // enter the send loop, so the first frame
                                    // sent is at the correct position.
                                    let tpts = nd.ts_to_pts(ts);
                                    nd.burn_to_pts(tpts);
                                    decoder = Some((new_id, nd));
                                }
                                Err(e) => { eprintln!("[pb] open: {e}"); decoder = None; }
                            }
                            continue;
                        }
                        Ok(PlaybackCmd::Stop) => { decoder = None; continue; }
                        Err(TryRecvError::Disconnected) => return,
                        Err(TryRecvError::Empty) => {}
                    }
                    match d.next_frame() {
                        Some((data, w, h, ts_secs)) => {
                            let f = PlaybackFrame { id, timestamp: ts_secs, width: w, height: h, data };
                            if pb_frame_tx.send(f).is_err() { return; }
                        }
                        None => { decoder = None; } // EOF
                    }
                } else {
                    match pb_cmd_rx.recv() {
                        Ok(PlaybackCmd::Start { id, path, ts, aspect }) => {
                            match LiveDecoder::open(&path, ts, aspect) {
                                Ok(mut d) => {
                                    let tpts = d.ts_to_pts(ts);
                                    d.burn_to_pts(tpts);
                                    decoder = Some((id, d));
                                }
                                Err(e) => eprintln!("[pb] open: {e}"),
                            }
                        }
                        Ok(PlaybackCmd::Stop) => {}
                        Err(_) => return,
                    }
                }
            }
        });

        Self {
            rx, tx, scrub_rx, scrub_tx, frame_req, pb_tx, pb_rx,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // Wake the scrub decode thread with a poison-pill so it exits cleanly
        // instead of blocking forever on the condvar.
        let (lock, cvar) = &*self.frame_req;
        *lock.lock().unwrap() = Some(FrameRequest {
            id:        Uuid::nil(),
            path:      PathBuf::new(),
            timestamp: 0.0,
            aspect:    0.0,
        });
        cvar.notify_one();
    }

    /// Probe duration, dimensions, and poster thumbnail on a background thread.
    /// One clip is probed at a time in practice (selection replaces selection),
    /// so no concurrency gate is needed.
    pub fn probe_clip(&self, id: Uuid, path: PathBuf) {
        let tx = self.tx.clone();
        let sd = self.shutdown.clone();
        thread::spawn(move || {
            if sd.load(Ordering::Relaxed) { return; }
            let dur = probe_duration(&path, id, &tx);
            if sd.load(Ordering::Relaxed) { return; }
            probe_video_size_and_thumbnail(&path, id, dur, &tx);
        });
    }

    pub fn request_frame(&self, id: Uuid, path: PathBuf, timestamp: f64, aspect: f32) {
        // Overwrite any pending request — the decode thread always gets the freshest one.
        let (lock, cvar) = &*self.frame_req;
        *lock.lock().unwrap() = Some(FrameRequest { id, path, timestamp, aspect });
        cvar.notify_one();
    }

    /// Start the dedicated playback pipeline at `ts` seconds into `path`.
    pub fn start_playback(&self, id: Uuid, path: PathBuf, ts: f64, aspect: f32) {
        // Flush stale frames from the previous playback session.
        while self.pb_rx.try_recv().is_ok() {}
        let _ = self.pb_tx.try_send(PlaybackCmd::Start { id, path, ts, aspect });
    }

    /// Stop the dedicated playback pipeline.
    pub fn stop_playback(&self) {
        let _ = self.pb_tx.try_send(PlaybackCmd::Stop);
    }
}
