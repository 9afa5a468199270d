//! Thin, safe wrapper around the subset of libtwolame's C API the ADR
//! framer drives, matching `adr.c`'s call sequence exactly: `init`, a run of
//! `set_*` configuration calls, `init_params`, then per-frame
//! `encode_buffer_interleaved`.

use std::ffi::c_int;

use crate::error::DspError;

#[allow(non_camel_case_types)]
#[repr(C)]
struct twolame_options {
    _private: [u8; 0],
}

#[allow(non_camel_case_types, dead_code)]
#[repr(C)]
#[derive(Clone, Copy)]
enum TwolameMpegMode {
    Stereo = 0,
    JointStereo = 1,
    DualChannel = 2,
    Mono = 3,
}

unsafe extern "C" {
    fn twolame_init() -> *mut twolame_options;
    fn twolame_set_in_samplerate(opts: *mut twolame_options, rate: c_int) -> c_int;
    fn twolame_set_out_samplerate(opts: *mut twolame_options, rate: c_int) -> c_int;
    fn twolame_set_bitrate(opts: *mut twolame_options, bitrate: c_int) -> c_int;
    fn twolame_set_num_channels(opts: *mut twolame_options, channels: c_int) -> c_int;
    fn twolame_set_mode(opts: *mut twolame_options, mode: TwolameMpegMode) -> c_int;
    fn twolame_set_error_protection(opts: *mut twolame_options, enable: c_int) -> c_int;
    fn twolame_set_num_ancillary_bits(opts: *mut twolame_options, bits: c_int) -> c_int;
    fn twolame_set_DAB(opts: *mut twolame_options, enable: c_int) -> c_int;
    fn twolame_set_DAB_scf_crc_length(opts: *mut twolame_options) -> c_int;
    fn twolame_init_params(opts: *mut twolame_options) -> c_int;
    fn twolame_encode_buffer_interleaved(
        opts: *mut twolame_options,
        pcm: *const i16,
        num_samples: c_int,
        bytes: *mut u8,
        bytes_size: c_int,
    ) -> c_int;
    fn twolame_close(opts: *mut *mut twolame_options);
}

/// Samples per MP2 frame at the fixed 48 kHz / 192 kbit/s operating point.
pub const PCM_SAMPLES_PER_FRAME: usize = 1152;
/// Size of one encoded MP2 frame.
pub const MP2_FRAME_LEN: usize = 576;
/// Number of ancillary bits reserved per frame (36 bytes x 8).
const ANCILLARY_BITS: i32 = 36 * 8;

pub struct Mp2Encoder {
    opts: *mut twolame_options,
    channels: usize,
}

/// `libtwolame` options aren't `Send` by default (it's a plain C struct),
/// but the ADR framer owns it exclusively and never shares it across
/// threads; this mirrors the single-threaded ownership the rest of the
/// signal chain assumes.
unsafe impl Send for Mp2Encoder {}

impl Mp2Encoder {
    /// Mirrors `adr.c`'s encoder setup: 48 kHz in/out, 192 kbit/s, error
    /// protection on, 36 bytes of ancillary space, and (when `scfcrc`) DAB
    /// mode with the ScF-CRC extension enabled.
    pub fn new(stereo: bool, scfcrc: bool) -> crate::error::Result<Self> {
        let opts = unsafe { twolame_init() };
        if opts.is_null() {
            return Err(DspError::Mp2("twolame_init failed".into()));
        }

        let mode = if stereo {
            TwolameMpegMode::JointStereo
        } else {
            TwolameMpegMode::Mono
        };

        unsafe {
            check(twolame_set_in_samplerate(opts, 48_000), "set_in_samplerate")?;
            check(twolame_set_out_samplerate(opts, 48_000), "set_out_samplerate")?;
            check(twolame_set_bitrate(opts, 192), "set_bitrate")?;
            check(twolame_set_num_channels(opts, if stereo { 2 } else { 1 }), "set_num_channels")?;
            check(twolame_set_mode(opts, mode), "set_mode")?;
            check(twolame_set_error_protection(opts, 1), "set_error_protection")?;
            check(twolame_set_num_ancillary_bits(opts, ANCILLARY_BITS), "set_num_ancillary_bits")?;

            if scfcrc {
                check(twolame_set_DAB(opts, 1), "set_DAB")?;
                check(twolame_set_DAB_scf_crc_length(opts), "set_DAB_scf_crc_length")?;
            }

            check(twolame_init_params(opts), "init_params")?;
        }

        Ok(Mp2Encoder { opts, channels: if stereo { 2 } else { 1 } })
    }

    /// Encodes exactly [`PCM_SAMPLES_PER_FRAME`] interleaved PCM samples
    /// (`PCM_SAMPLES_PER_FRAME * channels` values in `pcm`). Returns `None`
    /// on an encoder underrun (the encoder returned <= 0 bytes, e.g. while
    /// its internal bit-reservoir is still filling) — the caller retries on
    /// the next block, per the spec's "skip frame" error policy.
    pub fn encode(&mut self, pcm: &[i16], out: &mut [u8; MP2_FRAME_LEN]) -> Option<()> {
        debug_assert_eq!(pcm.len(), PCM_SAMPLES_PER_FRAME * self.channels);
        let n = unsafe {
            twolame_encode_buffer_interleaved(
                self.opts,
                pcm.as_ptr(),
                PCM_SAMPLES_PER_FRAME as c_int,
                out.as_mut_ptr(),
                out.len() as c_int,
            )
        };
        (n > 0).then_some(())
    }
}

impl Drop for Mp2Encoder {
    fn drop(&mut self) {
        unsafe { twolame_close(&mut self.opts) };
    }
}

fn check(code: c_int, call: &'static str) -> crate::error::Result<()> {
    if code < 0 { Err(DspError::Mp2(format!("{call} returned {code}"))) } else { Ok(()) }
}
