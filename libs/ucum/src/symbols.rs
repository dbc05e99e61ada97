//! Closed symbol sets recognised by the grammar.
//!
//! The grammar has no general lexer: every token class is a fixed enumeration.
//! Matching order is encoded explicitly in [`MATCHERS`], most specific first.

use phf::phf_set;

use crate::ast::UnitClass;

/// The twenty SI prefix codes.
pub static PREFIXES: phf::Set<&'static str> = phf_set! {
    "Y", "Z", "E", "P", "T", "G", "M", "k", "h", "da", "d", "c", "m", "u", "n", "p", "f", "a",
    "z", "y",
};

/// Base-unit symbols eligible for prefixing.
pub static METRIC: phf::Set<&'static str> = phf_set! {
    "ar", "A", "Bq", "B", "cd", "C", "eV", "F", "Gy", "g", "Hz", "H", "J", "kat", "K", "lm",
    "lx", "L", "mol", "m", "Np", "N", "Ohm", "Pa", "rad", "Sv", "sr", "s", "S", "T", "t", "u",
    "V", "Wb", "W", "''",
};

/// Treated as metric, never prefixed.
pub static NON_PREFIXED_METRIC: phf::Set<&'static str> = phf_set! {
    "AU", "Cel", "deg", "d", "h", "min", "'",
};

pub static CONVENTIONAL: phf::Set<&'static str> = phf_set! {
    "%", "a_g", "a_j", "a_t", "Ao", "atm", "att", "a", "bar", "Bd", "Bi", "bit_s", "bit", "By",
    "b", "cal_IT", "cal_m", "cal_th", "cal", "Ci", "circ", "dyn", "eq", "erg", "g%", "Gal",
    "Gb", "gf", "gon", "G", "Ky", "Lmb", "mho", "mo_g", "mo_j", "mo_s", "mo", "Mx", "Oe",
    "osm", "pc", "ph", "P", "RAD", "REM", "R", "sb", "sph", "St", "st", "tex", "U", "wk",
};

pub static CONVENTIONAL_BRACKETED: phf::Set<&'static str> = phf_set! {
    "[acr_br]", "[acr_us]", "[Amb'a'1'U]", "[anti'Xa'U]", "[APL'U]", "[arb'U]", "[AU]",
    "[BAU]", "[bbl_us]", "[bdsk'U]", "[beth'U]", "[bf_i]", "[Btu_39]", "[Btu_59]", "[Btu_60]",
    "[Btu_IT]", "[Btu_m]", "[Btu_th]", "[Btu]", "[bu_br]", "[bu_us]", "[c]", "[Cal]",
    "[car_Au]", "[car_m]", "[CCID_50]", "[cft_i]", "[CFU]", "[ch_br]", "[ch_us]", "[Ch]",
    "[cicero]", "[cin_i]", "[cml_i]", "[cr_i]", "[crd_us]", "[cup_m]", "[cup_us]", "[cyd_i]",
    "[D'ag'U]", "[degF]", "[degR]", "[degRe]", "[den]", "[didot]", "[diop]", "[dpt_us]",
    "[dqt_us]", "[dr_ap]", "[dr_av]", "[drp]", "[dye'U]", "[e]", "[EID_50]", "[ELU]",
    "[eps_0]", "[EU]", "[fdr_br]", "[fdr_us]", "[FEU]", "[FFU]", "[foz_br]", "[foz_m]",
    "[foz_us]", "[ft_br]", "[ft_i]", "[ft_us]", "[fth_br]", "[fth_i]", "[fth_us]", "[fur_us]",
    "[G]", "[g]", "[gal_br]", "[gal_us]", "[gal_wi]", "[gil_br]", "[gil_us]", "[GPL'U]",
    "[gr]", "[h]", "[hd_i]", "[hnsf'U]", "[hp_C]", "[hp_M]", "[hp_Q]", "[hp_X]", "[hp'_C]",
    "[hp'_M]", "[hp'_Q]", "[hp'_X]", "[HP]", "[HPF]", "[in_br]", "[in_i'H2O]", "[in_i'Hg]",
    "[in_i]", "[in_us]", "[IR]", "[IU]", "[iU]", "[k]", "[ka'U]", "[kn_br]", "[kn_i]",
    "[knk'U]", "[kp_C]", "[kp_M]", "[kp_Q]", "[kp_X]", "[lb_ap]", "[lb_av]", "[lb_tr]",
    "[lbf_av]", "[lcwt_av]", "[Lf]", "[ligne]", "[lk_br]", "[lk_us]", "[lne]", "[LPF]",
    "[lton_av]", "[ly]", "[m_e]", "[m_p]", "[mclg'U]", "[mesh_i]", "[MET]", "[mi_br]",
    "[mi_i]", "[mi_us]", "[mil_i]", "[mil_us]", "[min_br]", "[min_us]", "[MPL'U]", "[mu_0]",
    "[nmi_br]", "[nmi_i]", "[oz_ap]", "[oz_av]", "[oz_m]", "[oz_tr]", "[p'diop]", "[pc_br]",
    "[pca_pr]", "[pca]", "[PFU]", "[pH]", "[pi]", "[pied]", "[pk_br]", "[pk_us]", "[pnt_pr]",
    "[pnt]", "[PNU]", "[pouce]", "[ppb]", "[ppm]", "[ppth]", "[pptr]", "[PRU]", "[psi]",
    "[pt_br]", "[pt_us]", "[pwt_tr]", "[qt_br]", "[qt_us]", "[rch_us]", "[rd_br]", "[rd_us]",
    "[rlk_us]", "[S]", "[sc_ap]", "[sct]", "[scwt_av]", "[sft_i]", "[sin_i]", "[smgy'U]",
    "[smi_us]", "[smoot]", "[srd_us]", "[ston_av]", "[stone_av]", "[syd_i]", "[tb'U]",
    "[tbs_m]", "[tbs_us]", "[TCID_50]", "[todd'U]", "[tsp_m]", "[tsp_us]", "[twp]", "[USP'U]",
    "[wood'U]", "[yd_br]", "[yd_i]", "[yd_us]",
};

pub static CONVENTIONAL_MIXED_BRACKETED: phf::Set<&'static str> = phf_set! {
    "%[slope]", "B[10.nV]", "B[kW]", "B[mV]", "B[SPL]", "B[uV]", "B[V]", "B[W]", "cal_[15]",
    "cal_[20]", "m[H2O]", "m[Hg]",
};

/// `dar` reads as deci-are, never as deca + `r`.
pub const EXCEPTION: &str = "dar";

/// Longest symbol in any set above.
pub const MAX_SYMBOL_LEN: usize = 11;

/// One way of reading a unit symbol at the current input position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reading {
    pub prefix: Option<&'static str>,
    pub symbol: &'static str,
    pub class: UnitClass,
    /// Bytes consumed.
    pub len: usize,
}

/// Token matchers over the closed symbol sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Matcher {
    Exception,
    MixedBracketed,
    Bracketed,
    Conventional,
    NonPrefixedMetric,
    PrefixedMetric,
    Metric,
}

/// Priority order. When two readings consume the same number of bytes the one
/// produced by the earlier matcher wins.
pub const MATCHERS: [Matcher; 7] = [
    Matcher::Exception,
    Matcher::MixedBracketed,
    Matcher::Bracketed,
    Matcher::Conventional,
    Matcher::NonPrefixedMetric,
    Matcher::PrefixedMetric,
    Matcher::Metric,
];

impl Matcher {
    /// Every reading this matcher admits at the start of `rest`, longest first.
    pub fn readings(self, rest: &str) -> Vec<Reading> {
        match self {
            Matcher::Exception => {
                if rest.starts_with(EXCEPTION) {
                    vec![Reading {
                        prefix: Some("d"),
                        symbol: "ar",
                        class: UnitClass::Metric,
                        len: EXCEPTION.len(),
                    }]
                } else {
                    Vec::new()
                }
            }
            Matcher::MixedBracketed => plain(
                &CONVENTIONAL_MIXED_BRACKETED,
                rest,
                UnitClass::ConventionalMixedBracketed,
            ),
            Matcher::Bracketed => plain(
                &CONVENTIONAL_BRACKETED,
                rest,
                UnitClass::ConventionalBracketed,
            ),
            Matcher::Conventional => plain(&CONVENTIONAL, rest, UnitClass::Conventional),
            Matcher::NonPrefixedMetric => {
                plain(&NON_PREFIXED_METRIC, rest, UnitClass::NonMetricMetric)
            }
            Matcher::PrefixedMetric => {
                let mut out = Vec::new();
                for prefix_len in [2, 1] {
                    let Some(prefix) = lookup(&PREFIXES, rest, prefix_len) else {
                        continue;
                    };
                    let tail = &rest[prefix_len..];
                    for reading in plain(&METRIC, tail, UnitClass::Metric) {
                        out.push(Reading {
                            prefix: Some(prefix),
                            len: prefix_len + reading.len,
                            ..reading
                        });
                    }
                }
                out.sort_by(|a, b| b.len.cmp(&a.len));
                out
            }
            Matcher::Metric => plain(&METRIC, rest, UnitClass::Metric),
        }
    }
}

fn lookup(set: &'static phf::Set<&'static str>, rest: &str, len: usize) -> Option<&'static str> {
    rest.get(..len).and_then(|candidate| set.get_key(candidate)).copied()
}

fn plain(set: &'static phf::Set<&'static str>, rest: &str, class: UnitClass) -> Vec<Reading> {
    (1..=MAX_SYMBOL_LEN.min(rest.len()))
        .rev()
        .filter_map(|len| {
            lookup(set, rest, len).map(|symbol| Reading {
                prefix: None,
                symbol,
                class,
                len,
            })
        })
        .collect()
}

/// Picks the longest reading whose remainder satisfies `accept`, breaking
/// ties by matcher priority.
pub fn best_reading(rest: &str, accept: impl Fn(&str) -> bool) -> Option<Reading> {
    let mut best: Option<Reading> = None;
    for matcher in MATCHERS {
        for reading in matcher.readings(rest) {
            if !accept(&rest[reading.len..]) {
                continue;
            }
            if best.map_or(true, |b| reading.len > b.len) {
                best = Some(reading);
            }
        }
    }
    best
}
