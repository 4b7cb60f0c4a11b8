//! Serialization of timings and conversion results.
#![cfg(all(feature = "serde", feature = "formats"))]
use tapewave::audio::SampleCounter;
use tapewave::machine::{MachineProfile, TapeTiming, ZxSpectrum48};
use tapewave::formats::{convert_tzx, PulseWidthMode, TapeConverter, TapeInfo};

const TZX: &[u8] = b"ZXTape!\x1a\x01\x14\x30\x06Side A\x10\xe8\x03\x04\x00\xff\xf3\xaf\xa3";

#[test]
fn tape_info_serde_works() {
    let mut sink = SampleCounter::new(22050);
    let info = convert_tzx(TZX, &mut sink).unwrap();
    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(serde_json::json!({"major": 1, "minor": 20}), json["version"]);
    assert_eq!("Side A", json["blocks"][0]["kind"]["Text"]["description"]);
    let data = &json["blocks"][1]["kind"]["StandardSpeed"];
    assert_eq!(1000, data["pause_ms"]);
    assert_eq!(255, data["flag"]);
    assert_eq!(true, data["valid_checksum"]);
    assert_eq!("No header", data["header_text"]);
    let info2: TapeInfo = serde_json::from_value(json).unwrap();
    assert_eq!(info, info2);
}

#[test]
fn machine_timing_from_config_works() {
    let json = r#"{
        "clock_hz": 3500000,
        "lead_pulse": 2168,
        "sync_pulse1": 667,
        "sync_pulse2": 735,
        "zero_pulse": 855,
        "one_pulse": 1710,
        "lead_pulses_head": 8064,
        "lead_pulses_data": 3220
    }"#;
    let timing: TapeTiming = serde_json::from_str(json).unwrap();
    assert_eq!(TapeTiming::ZX_SPECTRUM_48, timing);
    let zx = ZxSpectrum48::with_timing(timing);
    assert_eq!(&timing, zx.timing());

    let mode: PulseWidthMode = serde_json::from_str(r#""Fractional""#).unwrap();
    let mut rounded = SampleCounter::new(44100);
    TapeConverter::new(&zx).convert_tzx(TZX, &mut rounded).unwrap();
    let mut fractional = SampleCounter::new(44100);
    TapeConverter::new(&zx).with_width_mode(mode).convert_tzx(TZX, &mut fractional).unwrap();
    assert!(fractional.count() > rounded.count());

    assert!(serde_json::from_str::<TapeTiming>(&json.replace("2168", "0")).is_err());
    assert!(serde_json::from_str::<TapeTiming>(&json.replace("3500000", "0")).is_err());
}
