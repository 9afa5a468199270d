//! The ADR digital frame pipeline: MP2 framing, ancillary data insertion,
//! V.35 scrambling and 1/2-rate convolutional FEC with 3/4 puncturing.
//!
//! Ties together every submodule in this file's per-frame order (spec
//! §4.7): encode one MP2 frame, insert its ancillary data, optionally patch
//! in the previous frame's ScF-CRC and release it one frame late, then run
//! the released frame through the scrambler and FEC encoder to produce the
//! 768-byte transport frame.

pub mod ancillary;
pub mod carousel;
pub mod crc;
pub mod fec;
pub mod hamming;
pub mod interleave;
pub mod mp2;
pub mod scrambler;

use carousel::{Carousel, MpegMode};
use fec::{ConvEncoder, pack_bits};
use interleave::ANCILLARY_OFFSET;
use mp2::{MP2_FRAME_LEN, Mp2Encoder, PCM_SAMPLES_PER_FRAME};
use scrambler::Scrambler;

use crate::error::Result;

/// Transport frame size after FEC: 6144 bits / 8.
pub const TRANSPORT_FRAME_LEN: usize = 768;

/// Everything downstream of the MP2 encode step: ancillary insertion, the
/// ScF-CRC one-frame delay, the V.35 scrambler and the convolutional FEC
/// encoder. Kept free of the `libtwolame` FFI binding so it can be driven
/// directly in tests with a synthetic MP2 frame.
struct AdrPipeline {
    carousel: Carousel,
    scrambler: Scrambler,
    conv: ConvEncoder,
    scfcrc: bool,
    held_frame: Option<[u8; MP2_FRAME_LEN]>,
}

impl AdrPipeline {
    fn new(station_name: &str, mode: MpegMode, scfcrc: bool) -> Self {
        AdrPipeline {
            carousel: Carousel::new(station_name, mode),
            scrambler: Scrambler::new(),
            conv: ConvEncoder::new(),
            scfcrc,
            held_frame: None,
        }
    }

    fn process(&mut self, mut frame: [u8; MP2_FRAME_LEN]) -> Option<[u8; TRANSPORT_FRAME_LEN]> {
        ancillary::insert_adr_ancillary(&mut frame, &mut self.carousel, self.scfcrc);

        let released = if self.scfcrc {
            match self.held_frame.take() {
                Some(mut prev) => {
                    let crc = crc::scf_crc(&prev);
                    // The ScF-CRC gap the interleaver reserves starts at
                    // region byte 30 (interleave.rs skips it by adding 4 to
                    // every byte index from 30 onward); bytes 34.. hold real
                    // interleaved codeword data and must not be overwritten.
                    let gap_start = ANCILLARY_OFFSET + 30;
                    prev[gap_start..gap_start + 4].copy_from_slice(&crc);
                    self.held_frame = Some(frame);
                    Some(prev)
                }
                None => {
                    self.held_frame = Some(frame);
                    None
                }
            }
        } else {
            Some(frame)
        };

        let released = released?;
        let scrambled = self.scrambler.scramble_frame(&released);
        // The convolutional encoder runs continuously across the whole
        // stream (its `sr`/`b` state is never reset per frame), same as the
        // scrambler above.
        let coded = self.conv.encode(&scrambled);
        let packed = pack_bits(&coded);

        let mut out = [0u8; TRANSPORT_FRAME_LEN];
        out.copy_from_slice(&packed);
        Some(out)
    }
}

pub struct AdrFramer {
    mp2: Mp2Encoder,
    pipeline: AdrPipeline,
    stereo: bool,
}

impl AdrFramer {
    pub fn new(station_name: &str, mode: MpegMode, stereo: bool, scfcrc: bool) -> Result<Self> {
        Ok(AdrFramer {
            mp2: Mp2Encoder::new(stereo, scfcrc)?,
            pipeline: AdrPipeline::new(station_name, mode, scfcrc),
            stereo,
        })
    }

    /// Number of interleaved PCM samples this framer consumes per call
    /// (`PCM_SAMPLES_PER_FRAME` per channel).
    pub fn pcm_samples_per_call(&self) -> usize {
        PCM_SAMPLES_PER_FRAME * if self.stereo { 2 } else { 1 }
    }

    /// Encodes one MP2 frame's worth of PCM, advances the ScF-CRC pipeline,
    /// and returns the 768-byte transport frame for whichever MP2 frame was
    /// released this call. Returns `None` on an encoder underrun or during
    /// the one-frame ScF-CRC warm-up.
    pub fn process(&mut self, pcm: &[i16]) -> Option<[u8; TRANSPORT_FRAME_LEN]> {
        let mut frame = [0u8; MP2_FRAME_LEN];
        self.mp2.encode(pcm, &mut frame)?;
        self.pipeline.process(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_released_frame_is_768_bytes() {
        let mut pipeline = AdrPipeline::new("TEST", MpegMode::Stereo, false);
        for n in 0..5u8 {
            let frame = [n; MP2_FRAME_LEN];
            let out = pipeline.process(frame).expect("no scfcrc delay, every frame releases");
            assert_eq!(out.len(), TRANSPORT_FRAME_LEN);
        }
    }

    #[test]
    fn scfcrc_mode_delays_the_first_frame_by_one() {
        let mut pipeline = AdrPipeline::new("TEST", MpegMode::Stereo, true);
        let frame0 = [0xAAu8; MP2_FRAME_LEN];
        assert!(pipeline.process(frame0).is_none());

        let frame1 = [0x55u8; MP2_FRAME_LEN];
        assert!(pipeline.process(frame1).is_some());
    }

    #[test]
    fn descrambler_recovers_ten_consecutive_frames() {
        // The scrambler runs continuously across frame boundaries (it's
        // self-synchronising, not reset per frame), so a single instance is
        // driven across all ten frames here, same as `AdrPipeline` does.
        let mut scrambler = Scrambler::new();
        let mut descrambler = scrambler::Descrambler::new();
        let mut carousel = Carousel::new("TEST", MpegMode::Stereo);

        for n in 0..10u32 {
            let mut frame = [0u8; MP2_FRAME_LEN];
            for (i, b) in frame.iter_mut().enumerate() {
                *b = ((n * 37 + i as u32) % 256) as u8;
            }
            ancillary::insert_adr_ancillary(&mut frame, &mut carousel, false);

            let scrambled = scrambler.scramble_frame(&frame);
            let recovered_bits = descrambler.descramble_bits(&scrambled);

            let original_bits: Vec<u8> = frame
                .iter()
                .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1))
                .collect();

            if n == 0 {
                // Give the self-synchronising register its documented
                // 20-bit convergence window on the very first frame only.
                assert_eq!(&recovered_bits[20..], &original_bits[20..]);
            } else {
                assert_eq!(recovered_bits, original_bits);
            }
        }
    }

    #[test]
    fn end_to_end_transport_frames_recover_ten_frames_through_fec_and_descrambler() {
        // Scenario 6: a full transport frame round trip (ancillary insertion,
        // scrambling, FEC encode, Viterbi decode, descrambling) on a clean
        // channel, across ten consecutive frames, same as the QPSK symbols
        // a receiver would demodulate back into bits. The scrambler, the
        // convolutional encoder, and its Viterbi counterpart all run
        // continuously across frame boundaries, matching `AdrPipeline`.
        let mut scrambler = Scrambler::new();
        let mut conv = ConvEncoder::new();
        let mut descrambler = scrambler::Descrambler::new();
        let mut carousel = Carousel::new("TEST", MpegMode::Stereo);
        let mut decode_state = 0u8;

        for n in 0..10u32 {
            let mut frame = [0u8; MP2_FRAME_LEN];
            for (i, b) in frame.iter_mut().enumerate() {
                *b = ((n * 37 + i as u32) % 256) as u8;
            }
            ancillary::insert_adr_ancillary(&mut frame, &mut carousel, false);

            let scrambled_bits = scrambler.scramble_frame(&frame);
            let coded = conv.encode(&scrambled_bits);
            let packed = pack_bits(&coded);

            // Unpack the transport bytes back to bits exactly as
            // `Channel::process_frame` does before driving the QPSK
            // modulator, to exercise the same byte-packing round trip.
            let coded_roundtrip: Vec<u8> = packed.iter().flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1)).collect();
            assert_eq!(coded_roundtrip, coded);

            let (recovered_scrambled, next_state) = fec::viterbi_decode(&coded_roundtrip, scrambled_bits.len(), decode_state);
            decode_state = next_state;
            let recovered_bits = descrambler.descramble_bits(&recovered_scrambled);

            let original_bits: Vec<u8> = frame.iter().flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1)).collect();

            if n == 0 {
                assert_eq!(&recovered_bits[20..], &original_bits[20..]);
            } else {
                assert_eq!(recovered_bits, original_bits);
            }
        }
    }
}
