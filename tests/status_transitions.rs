use setor_sampah_api::entity::penjualan_sampah::StatusPengajuan;

const ALL: [StatusPengajuan; 6] = [
    StatusPengajuan::Pengajuan,
    StatusPengajuan::PengajuanDiterima,
    StatusPengajuan::PengajuanDitolak,
    StatusPengajuan::PenawaranDiterima,
    StatusPengajuan::PenawaranDitolak,
    StatusPengajuan::Selesai,
];

#[test]
fn transition_table_is_exact() {
    use StatusPengajuan::*;
    let allowed = [
        (Pengajuan, PengajuanDiterima),
        (Pengajuan, PengajuanDitolak),
        (PengajuanDiterima, PenawaranDiterima),
        (PengajuanDiterima, PenawaranDitolak),
        (PenawaranDiterima, Selesai),
    ];

    for from in ALL {
        for to in ALL {
            let expected = allowed.contains(&(from, to));
            assert_eq!(
                from.can_transition_to(to),
                expected,
                "{:?} -> {:?}",
                from,
                to
            );
        }
    }
}

#[test]
fn terminal_states_accept_nothing() {
    use StatusPengajuan::*;
    for from in [PengajuanDitolak, PenawaranDitolak, Selesai] {
        assert!(from.is_terminal());
        for to in ALL {
            assert!(!from.can_transition_to(to), "{:?} -> {:?}", from, to);
        }
    }
    for from in [Pengajuan, PengajuanDiterima, PenawaranDiterima] {
        assert!(!from.is_terminal());
    }
}

#[test]
fn no_self_transitions() {
    for status in ALL {
        assert!(!status.can_transition_to(status), "{:?}", status);
    }
}

#[test]
fn wire_strings_round_trip() {
    for status in ALL {
        assert_eq!(StatusPengajuan::parse(status.as_str()), Some(status));
    }
    assert_eq!(StatusPengajuan::Pengajuan.as_str(), "pengajuan");
    assert_eq!(
        StatusPengajuan::PengajuanDiterima.as_str(),
        "pengajuan diterima"
    );
    assert_eq!(StatusPengajuan::parse("diterima"), None);
    assert_eq!(StatusPengajuan::parse(""), None);
}
