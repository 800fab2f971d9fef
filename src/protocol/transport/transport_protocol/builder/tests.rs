//! Unit tests for BAM/DT frame segmentation.
use super::*;

#[test]
/// A 12-byte payload (VesselSpeedComponents) segments into one BAM and two
/// DT frames, matching the wire layout in §6.2.
fn test_segments_twelve_bytes_into_bam_and_two_dt() {
    let payload: Vec<u8> = (1u8..=12).collect();
    let frames = build_frames(130578, 3, 35, &payload).expect("frames must build");

    assert_eq!(frames.len(), 3);

    let bam = &frames[0];
    assert_eq!(bam.id.pdu_format(), 0xEC);
    assert_eq!(bam.data[0], BAM_CONTROL_BYTE);
    assert_eq!(bam.data[1], 12); // size_lo
    assert_eq!(bam.data[2], 0); // size_hi
    assert_eq!(bam.data[3], 2); // total_packets
    assert_eq!(bam.data[4], 0xFF);

    let dt1 = &frames[1];
    assert_eq!(dt1.id.pdu_format(), 0xEB);
    assert_eq!(dt1.data, [1, 1, 2, 3, 4, 5, 6, 7]);

    let dt2 = &frames[2];
    assert_eq!(dt2.data, [2, 8, 9, 10, 11, 12, 0xFF, 0xFF]);
}

#[test]
/// A payload whose length is an exact multiple of 7 needs no padding.
fn test_exact_multiple_of_seven_needs_no_padding() {
    let payload: Vec<u8> = (1u8..=14).collect();
    let frames = build_frames(130311, 6, 12, &payload).expect("frames must build");
    assert_eq!(frames.len(), 3); // 1 BAM + 2 DT
    assert_eq!(frames[1].data, [1, 1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(frames[2].data, [2, 8, 9, 10, 11, 12, 13, 14]);
}

#[test]
/// Every frame of one transfer shares the same priority and source address.
fn test_all_frames_share_priority_and_source() {
    let payload = vec![0u8; 10];
    let frames = build_frames(130578, 5, 200, &payload).expect("frames must build");
    for frame in &frames {
        assert_eq!(frame.id.priority(), 5);
        assert_eq!(frame.id.source_address(), 200);
    }
}
