// crates/clipscout-media/src/decode.rs
//
// LiveDecoder: stateful decoder for the selected clip that avoids
// re-open/seek on every frame. Feeds both the scrub slot and the playback
// pipeline in worker.rs.

use std::path::PathBuf;
use anyhow::Result;

use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::{input, Pixel};
use ffmpeg::media::Type;
use ffmpeg::software::scaling::{context::Context as SwsContext, flag::Flags};

pub struct LiveDecoder {
    pub path:      PathBuf,
    pub ictx:      ffmpeg::format::context::Input,
    pub decoder:   ffmpeg::decoder::video::Video,
    pub video_idx: usize,
    pub last_pts:  i64,
    pub tb_num:    i32,
    pub tb_den:    i32,
    pub out_w:     u32,
    pub out_h:     u32,
    pub scaler:    SwsContext,
    /// When set, next_frame() burns decode-only (no scale/alloc) through the
    /// GOP until this PTS, so the first returned frame is at the requested
    /// position instead of the preceding keyframe.
    pub skip_until_pts: i64,
}

impl LiveDecoder {
    pub fn open(path: &PathBuf, timestamp: f64, aspect: f32) -> Result<Self> {
        let mut ictx = input(path)?;
        let video_idx = ictx.streams().best(Type::Video)
            .ok_or_else(|| anyhow::anyhow!("no video stream"))?.index();

        let (tb_num, tb_den, seek_ts, raw_w, raw_h) = {
            let stream = ictx.stream(video_idx).unwrap();
            let tb = stream.time_base();
            let seek_ts = (timestamp * tb.denominator() as f64 / tb.numerator() as f64) as i64;
            let (w, h) = unsafe {
                let p = stream.parameters().as_ptr();
                ((*p).width as u32, (*p).height as u32)
            };
            (tb.numerator(), tb.denominator(), seek_ts, w, h)
        };

        let _ = ictx.seek(seek_ts, ..=seek_ts);

        // Second context for decoder params (avoids borrow conflict with ictx).
        let ictx2   = input(path)?;
        let stream2 = ictx2.stream(video_idx).unwrap();
        let dec_ctx = ffmpeg::codec::context::Context::from_parameters(stream2.parameters())?;
        let decoder = dec_ctx.decoder().video()?;

        // Preview frames are scaled to a 640-wide canvas; aspect <= 0 keeps
        // the native resolution.
        let (out_w, out_h) = if aspect <= 0.0 {
            (raw_w.max(2), raw_h.max(2))
        } else {
            let w: u32 = 640;
            let h: u32 = ((w as f32 / aspect.max(0.01)) as u32).max(2) & !1;
            (w, h)
        };

        let scaler = SwsContext::get(
            decoder.format(), decoder.width(), decoder.height(),
            Pixel::RGBA, out_w, out_h, Flags::BILINEAR,
        )?;

        Ok(Self {
            path: path.clone(), ictx, decoder, video_idx,
            last_pts: seek_ts, tb_num, tb_den, out_w, out_h, scaler,
            skip_until_pts: 0,
        })
    }

    pub fn ts_to_pts(&self, t: f64) -> i64 {
        (t * self.tb_den as f64 / self.tb_num as f64) as i64
    }

    pub fn pts_to_secs(&self, pts: i64) -> f64 {
        pts as f64 * self.tb_num as f64 / self.tb_den as f64
    }

    /// Decode the next frame sequentially (no seek). Returns `(pixels, w, h, ts_secs)` or None at EOF.
    pub fn next_frame(&mut self) -> Option<(Vec<u8>, u32, u32, f64)> {
        for (stream, packet) in self.ictx.packets().flatten() {
            if stream.index() != self.video_idx { continue; }
            if self.decoder.send_packet(&packet).is_err() { continue; }
            let mut decoded = ffmpeg::util::frame::video::Video::empty();
            while self.decoder.receive_frame(&mut decoded).is_ok() {
                let pts = decoded.pts().unwrap_or(self.last_pts + 1);
                self.last_pts = pts;
                // Burn through pre-target frames without scaling.
                if pts < self.skip_until_pts { continue; }
                let ts_secs = self.pts_to_secs(pts);
                let mut out = ffmpeg::util::frame::video::Video::empty();
                if self.scaler.run(&decoded, &mut out).is_err() { return None; }
                let data = destripe(&out, self.out_w, self.out_h);
                return Some((data, self.out_w, self.out_h, ts_secs));
            }
        }
        None
    }

    /// Read forward until we find a frame at or past `target_pts`. Returns RGBA pixels.
    pub fn advance_to(&mut self, target_pts: i64) -> Option<(Vec<u8>, u32, u32)> {
        let mut last_good: Option<Vec<u8>> = None;
        for (stream, packet) in self.ictx.packets().flatten() {
            if stream.index() != self.video_idx { continue; }
            if self.decoder.send_packet(&packet).is_err() { continue; }
            let mut decoded = ffmpeg::util::frame::video::Video::empty();
            while self.decoder.receive_frame(&mut decoded).is_ok() {
                let pts = decoded.pts().unwrap_or(self.last_pts + 1);
                self.last_pts = pts;
                let mut out = ffmpeg::util::frame::video::Video::empty();
                if self.scaler.run(&decoded, &mut out).is_err() {
                    return last_good.map(|d| (d, self.out_w, self.out_h));
                }
                let data = destripe(&out, self.out_w, self.out_h);
                last_good = Some(data.clone());
                if pts < target_pts { continue; }
                return Some((data, self.out_w, self.out_h));
            }
        }
        last_good.map(|d| (d, self.out_w, self.out_h))
    }

    /// Decode-only fast-forward to `target_pts` — no scaling, no allocation.
    /// Used by the playback thread right after open so the first frame sent
    /// is at the seek position, not the preceding keyframe.
    pub fn burn_to_pts(&mut self, target_pts: i64) {
        for (stream, packet) in self.ictx.packets().flatten() {
            if stream.index() != self.video_idx { continue; }
            if self.decoder.send_packet(&packet).is_err() { continue; }
            let mut decoded = ffmpeg::util::frame::video::Video::empty();
            while self.decoder.receive_frame(&mut decoded).is_ok() {
                let pts = decoded.pts().unwrap_or(self.last_pts + 1);
                self.last_pts = pts;
                if pts >= target_pts {
                    return;
                }
            }
        }
    }
}

/// Copy visible pixels out of a scaled frame, dropping stride padding.
fn destripe(out: &ffmpeg::util::frame::video::Video, w: u32, h: u32) -> Vec<u8> {
    let stride = out.stride(0);
    let raw    = out.data(0);
    (0..h as usize)
        .flat_map(|row| {
            let s = row * stride;
            &raw[s..s + w as usize * 4]
        })
        .copied()
        .collect()
}
