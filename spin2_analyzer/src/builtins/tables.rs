//! Reserved-name tables
//!
//! Each entry is `(lowercase name, category, minimum language version)`.
//! A minimum version of 0 means the name exists in every version.
//! When a name appears in more than one table the first registration wins,
//! so the Spin table is ordered from most to least specific.

use super::BuiltinCategory as C;

pub(super) type Entry = (&'static str, C, u32);

#[rustfmt::skip]
pub(super) const SPIN_ENTRIES: &[Entry] = &[
    // sections
    ("con", C::BlockName, 0), ("obj", C::BlockName, 0), ("var", C::BlockName, 0),
    ("pub", C::BlockName, 0), ("pri", C::BlockName, 0), ("dat", C::BlockName, 0),

    // storage
    ("byte", C::StorageType, 0), ("word", C::StorageType, 0), ("long", C::StorageType, 0),
    ("bytefit", C::StorageType, 0), ("wordfit", C::StorageType, 0),
    ("struct", C::StorageType, 45),
    ("res", C::StorageType, 0), ("file", C::StorageType, 0),
    ("alignw", C::Alignment, 0), ("alignl", C::Alignment, 0),

    // flow
    ("abort", C::SpinControlFlow, 0), ("return", C::SpinControlFlow, 0),
    ("if", C::SpinReserved, 0), ("ifnot", C::SpinReserved, 0),
    ("elseif", C::SpinReserved, 0), ("elseifnot", C::SpinReserved, 0), ("else", C::SpinReserved, 0),
    ("while", C::SpinReserved, 0), ("repeat", C::SpinReserved, 0), ("with", C::SpinReserved, 0),
    ("until", C::SpinReserved, 0), ("from", C::SpinReserved, 0), ("to", C::SpinReserved, 0),
    ("step", C::SpinReserved, 0), ("next", C::SpinReserved, 0), ("quit", C::SpinReserved, 0),
    ("case", C::SpinReserved, 0), ("case_fast", C::SpinReserved, 0), ("other", C::SpinReserved, 0),
    ("reg", C::SpinReserved, 0), ("field", C::SpinReserved, 0),

    // named operators
    ("sar", C::BinaryOperator, 0), ("ror", C::BinaryOperator, 0), ("rol", C::BinaryOperator, 0),
    ("rev", C::BinaryOperator, 0), ("zerox", C::BinaryOperator, 0), ("signx", C::BinaryOperator, 0),
    ("sca", C::BinaryOperator, 0), ("scas", C::BinaryOperator, 0), ("frac", C::BinaryOperator, 0),
    ("addbits", C::BinaryOperator, 0), ("addpins", C::BinaryOperator, 0),
    ("and", C::BinaryOperator, 0), ("or", C::BinaryOperator, 0), ("xor", C::BinaryOperator, 0),
    ("pow", C::BinaryOperator, 51),
    ("not", C::UnaryOperator, 0), ("abs", C::UnaryOperator, 0), ("fabs", C::UnaryOperator, 0),
    ("encod", C::UnaryOperator, 0), ("decod", C::UnaryOperator, 0), ("bmask", C::UnaryOperator, 0),
    ("ones", C::UnaryOperator, 0), ("sqrt", C::UnaryOperator, 0), ("fsqrt", C::UnaryOperator, 0),
    ("qlog", C::UnaryOperator, 0), ("qexp", C::UnaryOperator, 0),
    ("log", C::UnaryOperator, 51), ("log2", C::UnaryOperator, 51), ("log10", C::UnaryOperator, 51),
    ("exp", C::UnaryOperator, 51), ("exp2", C::UnaryOperator, 51), ("exp10", C::UnaryOperator, 51),

    // constants
    ("false", C::NumericSymbol, 0), ("true", C::NumericSymbol, 0), ("negx", C::NumericSymbol, 0),
    ("posx", C::NumericSymbol, 0), ("pi", C::NumericSymbol, 0),
    ("float", C::FloatConversion, 0), ("trunc", C::FloatConversion, 0), ("round", C::FloatConversion, 0),
    ("_clkfreq", C::ClockSymbol, 0), ("_xtlfreq", C::ClockSymbol, 0), ("_xinfreq", C::ClockSymbol, 0),
    ("_rcslow", C::ClockSymbol, 0), ("_rcfast", C::ClockSymbol, 0),
    ("clkmode_", C::ClockSymbol, 0), ("clkfreq_", C::ClockSymbol, 0),
    ("_autoclk", C::ClockSymbol, 46),
    ("cogexec", C::CoginitSymbol, 0), ("hubexec", C::CoginitSymbol, 0),
    ("cogexec_new", C::CoginitSymbol, 0), ("hubexec_new", C::CoginitSymbol, 0),
    ("cogexec_new_pair", C::CoginitSymbol, 0), ("hubexec_new_pair", C::CoginitSymbol, 0),
    ("newcog", C::CoginitSymbol, 0),
    ("newtask", C::TaskSymbol, 47), ("thistask", C::TaskSymbol, 47),

    // variables and registers
    ("clkmode", C::HubVariable, 0), ("clkfreq", C::HubVariable, 0), ("varbase", C::HubVariable, 0),
    ("pr0", C::CogRegister, 0), ("pr1", C::CogRegister, 0), ("pr2", C::CogRegister, 0),
    ("pr3", C::CogRegister, 0), ("pr4", C::CogRegister, 0), ("pr5", C::CogRegister, 0),
    ("pr6", C::CogRegister, 0), ("pr7", C::CogRegister, 0),
    ("ijmp1", C::CogRegister, 0), ("ijmp2", C::CogRegister, 0), ("ijmp3", C::CogRegister, 0),
    ("iret1", C::CogRegister, 0), ("iret2", C::CogRegister, 0), ("iret3", C::CogRegister, 0),
    ("pa", C::CogRegister, 0), ("pb", C::CogRegister, 0), ("ptra", C::CogRegister, 0),
    ("ptrb", C::CogRegister, 0), ("dira", C::CogRegister, 0), ("dirb", C::CogRegister, 0),
    ("outa", C::CogRegister, 0), ("outb", C::CogRegister, 0), ("ina", C::CogRegister, 0),
    ("inb", C::CogRegister, 0),
    ("taskhlt", C::CogRegister, 47),

    // methods
    ("hubset", C::BuiltinMethod, 0), ("clkset", C::BuiltinMethod, 0), ("cogspin", C::BuiltinMethod, 0),
    ("coginit", C::BuiltinMethod, 0), ("cogstop", C::BuiltinMethod, 0), ("cogid", C::BuiltinMethod, 0),
    ("cogchk", C::BuiltinMethod, 0), ("locknew", C::BuiltinMethod, 0), ("lockret", C::BuiltinMethod, 0),
    ("locktry", C::BuiltinMethod, 0), ("lockrel", C::BuiltinMethod, 0), ("lockchk", C::BuiltinMethod, 0),
    ("cogatn", C::BuiltinMethod, 0), ("pollatn", C::BuiltinMethod, 0), ("waitatn", C::BuiltinMethod, 0),
    ("pinw", C::BuiltinMethod, 0), ("pinwrite", C::BuiltinMethod, 0), ("pinr", C::BuiltinMethod, 0),
    ("pinread", C::BuiltinMethod, 0), ("pinl", C::BuiltinMethod, 0), ("pinlow", C::BuiltinMethod, 0),
    ("pinh", C::BuiltinMethod, 0), ("pinhigh", C::BuiltinMethod, 0), ("pint", C::BuiltinMethod, 0),
    ("pintoggle", C::BuiltinMethod, 0), ("pinf", C::BuiltinMethod, 0), ("pinfloat", C::BuiltinMethod, 0),
    ("pinstart", C::BuiltinMethod, 0), ("pinclear", C::BuiltinMethod, 0), ("wrpin", C::BuiltinMethod, 0),
    ("wxpin", C::BuiltinMethod, 0), ("wypin", C::BuiltinMethod, 0), ("akpin", C::BuiltinMethod, 0),
    ("rdpin", C::BuiltinMethod, 0), ("rqpin", C::BuiltinMethod, 0),
    ("getct", C::BuiltinMethod, 0), ("pollct", C::BuiltinMethod, 0), ("waitct", C::BuiltinMethod, 0),
    ("waitus", C::BuiltinMethod, 0), ("waitms", C::BuiltinMethod, 0), ("getsec", C::BuiltinMethod, 0),
    ("getms", C::BuiltinMethod, 0),
    ("call", C::BuiltinMethod, 0), ("regexec", C::BuiltinMethod, 0), ("regload", C::BuiltinMethod, 0),
    ("rotxy", C::BuiltinMethod, 0), ("polxy", C::BuiltinMethod, 0), ("xypol", C::BuiltinMethod, 0),
    ("qsin", C::BuiltinMethod, 0), ("qcos", C::BuiltinMethod, 0), ("muldiv64", C::BuiltinMethod, 0),
    ("getrnd", C::BuiltinMethod, 0), ("nan", C::BuiltinMethod, 0),
    ("getregs", C::BuiltinMethod, 0), ("setregs", C::BuiltinMethod, 0),
    ("bytemove", C::BuiltinMethod, 0), ("wordmove", C::BuiltinMethod, 0), ("longmove", C::BuiltinMethod, 0),
    ("bytefill", C::BuiltinMethod, 0), ("wordfill", C::BuiltinMethod, 0), ("longfill", C::BuiltinMethod, 0),
    ("strsize", C::BuiltinMethod, 0), ("strcomp", C::BuiltinMethod, 0), ("strcopy", C::BuiltinMethod, 0),
    ("getcrc", C::BuiltinMethod, 0), ("string", C::BuiltinMethod, 0),
    ("lookup", C::BuiltinMethod, 0), ("lookupz", C::BuiltinMethod, 0),
    ("lookdown", C::BuiltinMethod, 0), ("lookdownz", C::BuiltinMethod, 0),
    ("lstring", C::BuiltinMethod, 42),
    ("byteswap", C::BuiltinMethod, 44), ("wordswap", C::BuiltinMethod, 44), ("longswap", C::BuiltinMethod, 44),
    ("bytecomp", C::BuiltinMethod, 44), ("wordcomp", C::BuiltinMethod, 44), ("longcomp", C::BuiltinMethod, 44),
    ("fill", C::BuiltinMethod, 44), ("copy", C::BuiltinMethod, 44),
    ("swap", C::BuiltinMethod, 44), ("comp", C::BuiltinMethod, 44),
    ("sizeof", C::BuiltinMethod, 45),
    ("taskspin", C::BuiltinMethod, 47), ("tasknext", C::BuiltinMethod, 47), ("taskstop", C::BuiltinMethod, 47),
    ("taskhalt", C::BuiltinMethod, 47), ("taskcont", C::BuiltinMethod, 47), ("taskchk", C::BuiltinMethod, 47),
    ("taskid", C::BuiltinMethod, 47),
    ("send", C::MethodPointerOp, 0), ("recv", C::MethodPointerOp, 0),

    // debug
    ("debug", C::DebugInvoke, 0), ("debug_main", C::DebugInvoke, 0), ("debug_coginit", C::DebugInvoke, 0),
    ("download_baud", C::DebugControlSymbol, 0), ("debug_cogs", C::DebugControlSymbol, 0),
    ("debug_delay", C::DebugControlSymbol, 0), ("debug_pin_tx", C::DebugControlSymbol, 0),
    ("debug_pin_rx", C::DebugControlSymbol, 0), ("debug_baud", C::DebugControlSymbol, 0),
    ("debug_timestamp", C::DebugControlSymbol, 0), ("debug_log_size", C::DebugControlSymbol, 0),
    ("debug_left", C::DebugControlSymbol, 0), ("debug_top", C::DebugControlSymbol, 0),
    ("debug_width", C::DebugControlSymbol, 0), ("debug_height", C::DebugControlSymbol, 0),
    ("debug_display_left", C::DebugControlSymbol, 0), ("debug_display_top", C::DebugControlSymbol, 0),
    ("debug_windows_off", C::DebugControlSymbol, 0),
    ("debug_mask", C::DebugControlSymbol, 46), ("debug_disable", C::DebugControlSymbol, 46),

    // assembly directives usable from Spin sections
    ("org", C::PasmLangDirective, 0), ("orgf", C::PasmLangDirective, 0), ("orgh", C::PasmLangDirective, 0),
    ("end", C::PasmLangDirective, 0), ("fit", C::PasmLangDirective, 0),
    ("ditto", C::PasmLangDirective, 50),
];

/// Smart-pin mode and event names, constants usable from Spin and PASM
#[rustfmt::skip]
pub(super) const HARDWARE_CONSTANTS: &[&str] = &[
    "p_true_a", "p_invert_a", "p_local_a", "p_plus1_a", "p_plus2_a", "p_plus3_a", "p_outbit_a",
    "p_minus3_a", "p_minus2_a", "p_minus1_a", "p_true_b", "p_invert_b", "p_local_b", "p_plus1_b",
    "p_plus2_b", "p_plus3_b", "p_outbit_b", "p_minus3_b", "p_minus2_b", "p_minus1_b", "p_pass_ab",
    "p_and_ab", "p_or_ab", "p_xor_ab", "p_filt0_ab", "p_filt1_ab", "p_filt2_ab", "p_filt3_ab",
    "p_logic_a", "p_logic_a_fb", "p_logic_b_fb", "p_schmitt_a", "p_schmitt_a_fb", "p_schmitt_b_fb",
    "p_compare_ab", "p_compare_ab_fb", "p_adc_gio", "p_adc_vio", "p_adc_float", "p_adc_1x",
    "p_adc_3x", "p_adc_10x", "p_adc_30x", "p_adc_100x", "p_dac_990r_3v", "p_dac_600r_2v",
    "p_dac_124r_3v", "p_dac_75r_2v", "p_level_a", "p_level_a_fbn", "p_level_b_fbp", "p_level_b_fbn",
    "p_async_io", "p_sync_io", "p_true_in", "p_invert_in", "p_true_output", "p_invert_output",
    "p_high_fast", "p_high_1k5", "p_high_15k", "p_high_150k", "p_high_1ma", "p_high_100ua",
    "p_high_10ua", "p_high_float", "p_low_fast", "p_low_1k5", "p_low_15k", "p_low_150k", "p_low_1ma",
    "p_low_100ua", "p_low_10ua", "p_low_float", "p_tt_00", "p_tt_01", "p_tt_10", "p_tt_11", "p_oe",
    "p_channel", "p_bitdac", "p_normal", "p_repository", "p_dac_noise", "p_dac_dither_rnd",
    "p_dac_dither_pwm", "p_pulse", "p_transition", "p_nco_freq", "p_nco_duty", "p_pwm_triangle",
    "p_pwm_sawtooth", "p_pwm_smps", "p_quadrature", "p_reg_up", "p_reg_up_down", "p_count_rises",
    "p_count_highs", "p_state_ticks", "p_high_ticks", "p_events_ticks", "p_periods_ticks",
    "p_periods_highs", "p_counter_ticks", "p_counter_highs", "p_counter_periods", "p_adc",
    "p_adc_ext", "p_adc_scope", "p_usb_pair", "p_sync_tx", "p_sync_rx", "p_async_tx", "p_async_rx",
    "event_atn", "event_ct1", "event_ct2", "event_ct3", "event_fbw", "event_int", "int_off",
    "event_pat", "event_qmt", "event_se1", "event_se2", "event_se3", "event_se4", "event_xfi",
    "event_xmt", "event_xrl", "event_xro",
];

#[rustfmt::skip]
pub(super) const PASM_INSTRUCTIONS: &[&str] = &[
    "abs", "add", "addct1", "addct2", "addct3", "addpix", "adds", "addsx", "addx", "akpin", "allowi",
    "altb", "altd", "altgb", "altgn", "altgw", "alti", "altr", "alts", "altsb", "altsn", "altsw",
    "and", "andn", "asmclk", "augd", "augs", "bitc", "bith", "bitl", "bitnc", "bitnot", "bitnz",
    "bitrnd", "bitz", "blnpix", "bmask", "brk", "call", "calla", "callb", "calld", "callpa", "callpb",
    "cmp", "cmpm", "cmpr", "cmps", "cmpsub", "cmpsx", "cmpx", "cogatn", "cogbrk", "cogid", "coginit",
    "cogstop", "crcbit", "crcnib", "decmod", "decod", "dirc", "dirh", "dirl", "dirnc", "dirnot",
    "dirnz", "dirrnd", "dirz", "djf", "djnf", "djnz", "djz", "drvc", "drvh", "drvl", "drvnc",
    "drvnot", "drvnz", "drvrnd", "drvz", "encod", "execf", "fblock", "fge", "fges", "fle", "fles",
    "fltc", "flth", "fltl", "fltnc", "fltnot", "fltnz", "fltrnd", "fltz", "getbrk", "getbyte",
    "getct", "getnib", "getptr", "getqx", "getqy", "getrnd", "getscp", "getword", "getxacc",
    "hubset", "ijnz", "ijz", "incmod", "jatn", "jct1", "jct2", "jct3", "jfbw", "jint", "jmp",
    "jmprel", "jnatn", "jnct1", "jnct2", "jnct3", "jnfbw", "jnint", "jnpat", "jnqmt", "jnse1",
    "jnse2", "jnse3", "jnse4", "jnxfi", "jnxmt", "jnxrl", "jnxro", "jpat", "jqmt", "jse1", "jse2",
    "jse3", "jse4", "jxfi", "jxmt", "jxrl", "jxro", "loc", "locknew", "lockrel", "lockret",
    "locktry", "mergeb", "mergew", "mixpix", "modc", "modcz", "modz", "mov", "movbyts", "mul",
    "mulpix", "muls", "muxc", "muxnc", "muxnibs", "muxnits", "muxnz", "muxq", "muxz", "neg", "negc",
    "negnc", "negnz", "negz", "nixint1", "nixint2", "nixint3", "nop", "not", "ones", "or", "outc",
    "outh", "outl", "outnc", "outnot", "outnz", "outrnd", "outz", "pollatn", "pollct1", "pollct2",
    "pollct3", "pollfbw", "pollint", "pollpat", "pollqmt", "pollse1", "pollse2", "pollse3",
    "pollse4", "pollxfi", "pollxmt", "pollxrl", "pollxro", "pop", "popa", "popb", "push", "pusha",
    "pushb", "qdiv", "qexp", "qfrac", "qlog", "qmul", "qrotate", "qsqrt", "qvector", "rcl", "rcr",
    "rczl", "rczr", "rdbyte", "rdfast", "rdlong", "rdlut", "rdpin", "rdword", "rep", "resi0",
    "resi1", "resi2", "resi3", "ret", "reta", "retb", "reti0", "reti1", "reti2", "reti3", "rev",
    "rfbyte", "rflong", "rfvar", "rfvars", "rfword", "rgbexp", "rgbsqz", "rol", "rolbyte", "rolnib",
    "rolword", "ror", "rqpin", "sal", "sar", "sca", "scas", "setbyte", "setcfrq", "setci", "setcmod",
    "setcq", "setcy", "setd", "setdacs", "setint1", "setint2", "setint3", "setluts", "setnib",
    "setpat", "setpiv", "setpix", "setq", "setq2", "setr", "sets", "setscp", "setse1", "setse2",
    "setse3", "setse4", "setword", "setxfrq", "seussf", "seussr", "shl", "shr", "signx", "skip",
    "skipf", "splitb", "splitw", "stalli", "sub", "subr", "subs", "subsx", "subx", "sumc", "sumnc",
    "sumnz", "sumz", "test", "testb", "testbn", "testn", "testp", "testpn", "tjf", "tjnf", "tjns",
    "tjnz", "tjs", "tjv", "tjz", "trgint1", "trgint2", "trgint3", "waitatn", "waitct1", "waitct2",
    "waitct3", "waitfbw", "waitint", "waitpat", "waitse1", "waitse2", "waitse3", "waitse4", "waitx",
    "waitxfi", "waitxmt", "waitxrl", "waitxro", "wfbyte", "wflong", "wfword", "wmlong", "wrbyte",
    "wrc", "wrfast", "wrlong", "wrlut", "wrnc", "wrnz", "wrpin", "wrword", "wrz", "wxpin", "wypin",
    "xcont", "xinit", "xor", "xoro32", "xstop", "xzero", "zerox",
];

#[rustfmt::skip]
pub(super) const PASM_NON_ARG_INSTRUCTIONS: &[&str] = &[
    "nop", "resi3", "resi2", "resi1", "resi0", "reti3", "reti2", "reti1", "reti0", "xstop", "allowi",
    "stalli", "trgint1", "trgint2", "trgint3", "nixint1", "nixint2", "nixint3", "ret", "reta", "retb",
    "pollint", "pollct1", "pollct2", "pollct3", "pollse1", "pollse2", "pollse3", "pollse4", "pollpat",
    "pollfbw", "pollxmt", "pollxfi", "pollxro", "pollxrl", "pollatn", "pollqmt", "waitint", "waitct1",
    "waitct2", "waitct3", "waitse1", "waitse2", "waitse3", "waitse4", "waitpat", "waitfbw", "waitxmt",
    "waitxfi", "waitxro", "waitxrl", "waitatn",
];

pub(super) const PASM_EFFECTS: &[&str] = &[
    "wc", "wz", "wcz", "andc", "andz", "orc", "orz", "xorc", "xorz",
];

/// Operand names only meaningful in assembly (MODCZ operands and assembler symbols)
#[rustfmt::skip]
pub(super) const PASM_RESERVED: &[&str] = &[
    "_clr", "_nc_and_nz", "_nz_and_nc", "_gt", "_nc_and_z", "_z_and_nc", "_nc", "_ge", "_c_and_nz",
    "_nz_and_c", "_nz", "_ne", "_c_ne_z", "_z_ne_c", "_nc_or_nz", "_nz_or_nc", "_c_and_z", "_z_and_c",
    "_c_eq_z", "_z_eq_c", "_z", "_e", "_nc_or_z", "_z_or_nc", "_c", "_lt", "_c_or_nz", "_nz_or_c",
    "_c_or_z", "_z_or_c", "_le", "_set", "fvar", "fvars",
];

pub(super) const ILLEGAL_INLINE_DIRECTIVES: &[&str] = &["alignw", "alignl", "file", "orgh"];

#[rustfmt::skip]
pub(super) const P1_ASM_INSTRUCTIONS: &[&str] = &[
    "absneg", "addabs", "clkset", "hubop", "jmpret", "lockclr", "lockset", "max", "maxs", "min",
    "mins", "movd", "movi", "movs", "subabs", "waitcnt", "waitpeq", "waitpne", "waitvid",
];

pub(super) const P1_ASM_EFFECTS: &[&str] = &["nr", "wr"];

#[rustfmt::skip]
pub(super) const P1_SPIN_METHODS: &[&str] = &[
    "lockclr", "lockset", "constant", "chipver", "cognew", "waitcnt", "waitpeq", "waitpne",
    "waitvid", "reboot",
];

pub(super) const P1_SPIN_VARIABLES: &[&str] = &["result"];

#[rustfmt::skip]
pub(super) const P1_ASM_VARIABLES: &[&str] = &[
    "_clkmode", "_free", "_stack", "cnt", "xtal1", "xtal2", "xtal3", "rcfast", "rcslow", "pll1x",
    "pll2x", "pll4x", "pll8x", "pll16x", "ctra", "ctrb", "frqa", "frqb", "phsa", "phsb", "vcfg",
    "vscl", "par", "spr",
];

#[rustfmt::skip]
pub(super) const FLEXSPIN_DIRECTIVES: &[&str] = &[
    "#define", "#ifdef", "#ifndef", "#else", "#elseifdef", "#elseifndef", "#endif", "#error",
    "#include", "#warn", "#undef",
];

/// Debug output method families; each expands to the sized and array variants
pub(super) const DEBUG_NUMERIC_FAMILIES: &[&str] = &["udec", "sdec", "uhex", "shex", "ubin", "sbin"];

pub(super) const DEBUG_FAMILY_SUFFIXES: &[&str] = &[
    "",
    "_byte",
    "_word",
    "_long",
    "_reg_array",
    "_byte_array",
    "_word_array",
    "_long_array",
];

#[rustfmt::skip]
pub(super) const DEBUG_OTHER_METHODS: &[(&str, u32)] = &[
    ("fdec", 0), ("fdec_array", 0), ("fdec_reg_array", 0),
    ("zstr", 0), ("lstr", 0),
    ("dly", 0), ("pc_key", 0), ("pc_mouse", 0),
    ("if", 0), ("ifnot", 0),
    ("bool", 44), ("c_z", 46),
];

pub(super) const DEBUG_COLORS: &[&str] = &[
    "black", "white", "orange", "blue", "green", "cyan", "red", "magenta", "yellow", "grey", "gray",
];
