//! Static label points for the 30 Bandung kecamatan.
//!
//! The marker layer is independent of the boundary geometries: these
//! coordinates are fixed reference data, not derived from the polygons.

use rth_map_geography_models::MarkerPoint;

/// Map center used by the client viewport.
pub const MAP_CENTER: (f64, f64) = (-6.906_685_589_692_674, 107.615_519_192_971_35);

/// Label point per kecamatan, alphabetical by name.
pub const KECAMATAN_MARKERS: &[MarkerPoint] = &[
    MarkerPoint { name: "Andir", lat: -6.912_559_992_217_8, lng: 107.578_286_033_260_5 },
    MarkerPoint { name: "Antapani", lat: -6.914_683_812_948_6, lng: 107.660_001_475_816_2 },
    MarkerPoint { name: "Arcamanik", lat: -6.918_083_375_185_3, lng: 107.676_005_166_776_4 },
    MarkerPoint { name: "Astana Anyar", lat: -6.938_324_681_513_7, lng: 107.602_283_190_582_4 },
    MarkerPoint { name: "Babakan Ciparay", lat: -6.939_891_596_308_6, lng: 107.577_661_445_260_3 },
    MarkerPoint { name: "Bandung Kidul", lat: -6.956_440_910_86, lng: 107.629_923_903_137_7 },
    MarkerPoint { name: "Bandung Kulon", lat: -6.924_777_543_343_3, lng: 107.569_509_556_697_3 },
    MarkerPoint { name: "Bandung Wetan", lat: -6.904_310_901_362_6, lng: 107.617_297_864_004_3 },
    MarkerPoint { name: "Batununggal", lat: -6.922_989_697_813_9, lng: 107.637_760_678_789_1 },
    MarkerPoint { name: "Bojongloa Kaler", lat: -6.930_767_059_513_6, lng: 107.590_162_471_904_4 },
    MarkerPoint { name: "Bojongloa Kidul", lat: -6.949_607_264_997_2, lng: 107.597_414_491_307_9 },
    MarkerPoint { name: "Buahbatu", lat: -6.949_333_623_785, lng: 107.652_384_725_845 },
    MarkerPoint { name: "Cibeunying Kaler", lat: -6.884_194_054_889_4, lng: 107.628_971_353_764_3 },
    MarkerPoint { name: "Cibeunying Kidul", lat: -6.901_603_207_065_6, lng: 107.643_927_868_811_9 },
    MarkerPoint { name: "Cibiru", lat: -6.915_086_713_288_2, lng: 107.722_197_958_305_1 },
    MarkerPoint { name: "Cicendo", lat: -6.902_470_603_126, lng: 107.586_077_905_243_2 },
    MarkerPoint { name: "Cidadap", lat: -6.865_016_270_514_5, lng: 107.603_760_990_393_4 },
    MarkerPoint { name: "Cinambo", lat: -6.926_690_924_558, lng: 107.690_476_795_840_4 },
    MarkerPoint { name: "Coblong", lat: -6.884_279_765_874_6, lng: 107.613_112_285_011_4 },
    MarkerPoint { name: "Gedebage", lat: -6.950_307_764_934_6, lng: 107.696_415_778_130_5 },
    MarkerPoint { name: "Kiaracondong", lat: -6.921_712_687_695_6, lng: 107.648_792_769_701_3 },
    MarkerPoint { name: "Lengkong", lat: -6.931_360_402_340_3, lng: 107.623_267_546_978_3 },
    MarkerPoint { name: "Mandalajati", lat: -6.897_482_570_824_9, lng: 107.672_364_262_628_2 },
    MarkerPoint { name: "Panyileukan", lat: -6.931_104_056_083_3, lng: 107.705_620_337_868_4 },
    MarkerPoint { name: "Rancasari", lat: -6.951_234_165_84, lng: 107.672_626_078_811_7 },
    MarkerPoint { name: "Regol", lat: -6.938_335_323_692_9, lng: 107.611_695_314_029_5 },
    MarkerPoint { name: "Sukajadi", lat: -6.890_554_002_470_648, lng: 107.591_351_198_369_64 },
    MarkerPoint { name: "Sukasari", lat: -6.866_447_134_854_1, lng: 107.586_643_258_287_6 },
    MarkerPoint { name: "Sumur Bandung", lat: -6.914_442_301_617_9, lng: 107.613_758_467_977_5 },
    MarkerPoint { name: "Ujung Berung", lat: -6.908_752_823_754_1, lng: 107.704_505_749_578_1 },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_kecamatan_all_within_bandung() {
        assert_eq!(KECAMATAN_MARKERS.len(), 30);
        for marker in KECAMATAN_MARKERS {
            assert!(marker.lat > -7.0 && marker.lat < -6.8, "{}", marker.name);
            assert!(marker.lng > 107.5 && marker.lng < 107.8, "{}", marker.name);
        }
    }

    #[test]
    fn names_are_unique_and_sorted() {
        let mut names: Vec<&str> = KECAMATAN_MARKERS.iter().map(|m| m.name).collect();
        let original = names.clone();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names, original);
    }
}
