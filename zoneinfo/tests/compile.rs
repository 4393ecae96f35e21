use zoneinfo_compiler::{ZoneInfoCompiler, ZoneInfoData, ZoneRulesError};

// A zone that is on +01:00, moves to +02:00 in 2000 and back to +01:00
// in 2002, with a rule in 2001 that does not change the offset.
const SUMMER_ONCE: &str = "
Rule\tOnce\t2000\tonly\t-\tMar\tlastSun\t1:00u\t1:00\tS
Rule\tOnce\t2001\tonly\t-\tMar\tlastSun\t1:00u\t1:00\tS
Rule\tOnce\t2002\tonly\t-\tOct\tlastSun\t1:00u\t0\t-
Zone\tTest/Once\t1:00\tOnce\tT%sT
";

const CHICAGO: &str = "
# Rule\tNAME\tFROM\tTO\t-\tIN\tON\tAT\tSAVE\tLETTER
Rule\tUS\t1918\t1919\t-\tMar\tlastSun\t2:00\t1:00\tD
Rule\tUS\t1918\t1919\t-\tOct\tlastSun\t2:00\t0\tS
Rule\tUS\t1942\tonly\t-\tFeb\t9\t2:00\t1:00\tW # War
Rule\tUS\t1945\tonly\t-\tAug\t14\t23:00u\t1:00\tP # Peace
Rule\tUS\t1945\tonly\t-\tSep\t30\t2:00\t0\tS
Rule\tUS\t1967\t2006\t-\tOct\tlastSun\t2:00\t0\tS
Rule\tUS\t1967\t1973\t-\tApr\tlastSun\t2:00\t1:00\tD
Rule\tUS\t1974\tonly\t-\tJan\t6\t2:00\t1:00\tD
Rule\tUS\t1975\tonly\t-\tFeb\tlastSun\t2:00\t1:00\tD
Rule\tUS\t1976\t1986\t-\tApr\tlastSun\t2:00\t1:00\tD
Rule\tUS\t1987\t2006\t-\tApr\tSun>=1\t2:00\t1:00\tD
Rule\tUS\t2007\tmax\t-\tMar\tSun>=8\t2:00\t1:00\tD
Rule\tUS\t2007\tmax\t-\tNov\tSun>=1\t2:00\t0\tS
Rule\tChicago\t1920\tonly\t-\tJun\t13\t2:00\t1:00\tD
Rule\tChicago\t1920\t1921\t-\tOct\tlastSun\t2:00\t0\tS
Rule\tChicago\t1921\tonly\t-\tMar\tlastSun\t2:00\t1:00\tD
Rule\tChicago\t1922\t1966\t-\tApr\tlastSun\t2:00\t1:00\tD
Rule\tChicago\t1922\t1954\t-\tSep\tlastSun\t2:00\t0\tS
Rule\tChicago\t1955\t1966\t-\tOct\tlastSun\t2:00\t0\tS
Zone America/Chicago\t-5:50:36 -\tLMT\t1883 Nov 18 18:00u
\t\t\t-6:00\tUS\tC%sT\t1920
\t\t\t-6:00\tChicago\tC%sT\t1936 Mar  1  2:00
\t\t\t-5:00\t-\tEST\t1936 Nov 15  2:00
\t\t\t-6:00\tChicago\tC%sT\t1942
\t\t\t-6:00\tUS\tC%sT\t1946
\t\t\t-6:00\tChicago\tC%sT\t1967
\t\t\t-6:00\tUS\tC%sT
Link\tAmerica/Chicago\tUS/Central
";

// Every offset change of America/Chicago up to 2030 as
// (epoch seconds, offset before, offset after).
const CHICAGO_TRANSITIONS: [(i64, i64, i64); 221] = [
    (-2717647200, -21036, -21600), (-1633276800, -21600, -18000), (-1615136400, -18000, -21600),
    (-1601827200, -21600, -18000), (-1583686800, -18000, -21600), (-1563724800, -21600, -18000),
    (-1551632400, -18000, -21600), (-1538928000, -21600, -18000), (-1520182800, -18000, -21600),
    (-1504454400, -21600, -18000), (-1491757200, -18000, -21600), (-1473004800, -21600, -18000),
    (-1459702800, -18000, -21600), (-1441555200, -21600, -18000), (-1428253200, -18000, -21600),
    (-1410105600, -21600, -18000), (-1396803600, -18000, -21600), (-1378656000, -21600, -18000),
    (-1365354000, -18000, -21600), (-1347206400, -21600, -18000), (-1333904400, -18000, -21600),
    (-1315152000, -21600, -18000), (-1301850000, -18000, -21600), (-1283702400, -21600, -18000),
    (-1270400400, -18000, -21600), (-1252252800, -21600, -18000), (-1238950800, -18000, -21600),
    (-1220803200, -21600, -18000), (-1207501200, -18000, -21600), (-1189353600, -21600, -18000),
    (-1176051600, -18000, -21600), (-1157299200, -21600, -18000), (-1144602000, -18000, -21600),
    (-1125849600, -21600, -18000), (-1112547600, -18000, -21600), (-1094400000, -21600, -18000),
    (-1081098000, -18000, -21600), (-1067788800, -21600, -18000), (-1045414800, -18000, -21600),
    (-1031500800, -21600, -18000), (-1018198800, -18000, -21600), (-1000051200, -21600, -18000),
    (-986749200, -18000, -21600), (-967996800, -21600, -18000), (-955299600, -18000, -21600),
    (-936547200, -21600, -18000), (-923245200, -18000, -21600), (-905097600, -21600, -18000),
    (-891795600, -18000, -21600), (-880214400, -21600, -18000), (-765392400, -18000, -21600),
    (-747244800, -21600, -18000), (-733942800, -18000, -21600), (-715795200, -21600, -18000),
    (-702493200, -18000, -21600), (-684345600, -21600, -18000), (-671043600, -18000, -21600),
    (-652896000, -21600, -18000), (-639594000, -18000, -21600), (-620841600, -21600, -18000),
    (-608144400, -18000, -21600), (-589392000, -21600, -18000), (-576090000, -18000, -21600),
    (-557942400, -21600, -18000), (-544640400, -18000, -21600), (-526492800, -21600, -18000),
    (-513190800, -18000, -21600), (-495043200, -21600, -18000), (-481741200, -18000, -21600),
    (-463593600, -21600, -18000), (-447267600, -18000, -21600), (-431539200, -21600, -18000),
    (-415818000, -18000, -21600), (-400089600, -21600, -18000), (-384368400, -18000, -21600),
    (-368640000, -21600, -18000), (-352918800, -18000, -21600), (-337190400, -21600, -18000),
    (-321469200, -18000, -21600), (-305740800, -21600, -18000), (-289414800, -18000, -21600),
    (-273686400, -21600, -18000), (-257965200, -18000, -21600), (-242236800, -21600, -18000),
    (-226515600, -18000, -21600), (-210787200, -21600, -18000), (-195066000, -18000, -21600),
    (-179337600, -21600, -18000), (-163616400, -18000, -21600), (-147888000, -21600, -18000),
    (-131562000, -18000, -21600), (-116438400, -21600, -18000), (-100112400, -18000, -21600),
    (-84384000, -21600, -18000), (-68662800, -18000, -21600), (-52934400, -21600, -18000),
    (-37213200, -18000, -21600), (-21484800, -21600, -18000), (-5763600, -18000, -21600),
    (9964800, -21600, -18000), (25686000, -18000, -21600), (41414400, -21600, -18000),
    (57740400, -18000, -21600), (73468800, -21600, -18000), (89190000, -18000, -21600),
    (104918400, -21600, -18000), (120639600, -18000, -21600), (126691200, -21600, -18000),
    (152089200, -18000, -21600), (162374400, -21600, -18000), (183538800, -18000, -21600),
    (199267200, -21600, -18000), (215593200, -18000, -21600), (230716800, -21600, -18000),
    (247042800, -18000, -21600), (262771200, -21600, -18000), (278492400, -18000, -21600),
    (294220800, -21600, -18000), (309942000, -18000, -21600), (325670400, -21600, -18000),
    (341391600, -18000, -21600), (357120000, -21600, -18000), (372841200, -18000, -21600),
    (388569600, -21600, -18000), (404895600, -18000, -21600), (420019200, -21600, -18000),
    (436345200, -18000, -21600), (452073600, -21600, -18000), (467794800, -18000, -21600),
    (483523200, -21600, -18000), (499244400, -18000, -21600), (514972800, -21600, -18000),
    (530694000, -18000, -21600), (544608000, -21600, -18000), (562143600, -18000, -21600),
    (576057600, -21600, -18000), (594198000, -18000, -21600), (607507200, -21600, -18000),
    (625647600, -18000, -21600), (638956800, -21600, -18000), (657097200, -18000, -21600),
    (671011200, -21600, -18000), (688546800, -18000, -21600), (702460800, -21600, -18000),
    (719996400, -18000, -21600), (733910400, -21600, -18000), (752050800, -18000, -21600),
    (765360000, -21600, -18000), (783500400, -18000, -21600), (796809600, -21600, -18000),
    (814950000, -18000, -21600), (828864000, -21600, -18000), (846399600, -18000, -21600),
    (860313600, -21600, -18000), (877849200, -18000, -21600), (891763200, -21600, -18000),
    (909298800, -18000, -21600), (923212800, -21600, -18000), (941353200, -18000, -21600),
    (954662400, -21600, -18000), (972802800, -18000, -21600), (986112000, -21600, -18000),
    (1004252400, -18000, -21600), (1018166400, -21600, -18000), (1035702000, -18000, -21600),
    (1049616000, -21600, -18000), (1067151600, -18000, -21600), (1081065600, -21600, -18000),
    (1099206000, -18000, -21600), (1112515200, -21600, -18000), (1130655600, -18000, -21600),
    (1143964800, -21600, -18000), (1162105200, -18000, -21600), (1173600000, -21600, -18000),
    (1194159600, -18000, -21600), (1205049600, -21600, -18000), (1225609200, -18000, -21600),
    (1236499200, -21600, -18000), (1257058800, -18000, -21600), (1268553600, -21600, -18000),
    (1289113200, -18000, -21600), (1300003200, -21600, -18000), (1320562800, -18000, -21600),
    (1331452800, -21600, -18000), (1352012400, -18000, -21600), (1362902400, -21600, -18000),
    (1383462000, -18000, -21600), (1394352000, -21600, -18000), (1414911600, -18000, -21600),
    (1425801600, -21600, -18000), (1446361200, -18000, -21600), (1457856000, -21600, -18000),
    (1478415600, -18000, -21600), (1489305600, -21600, -18000), (1509865200, -18000, -21600),
    (1520755200, -21600, -18000), (1541314800, -18000, -21600), (1552204800, -21600, -18000),
    (1572764400, -18000, -21600), (1583654400, -21600, -18000), (1604214000, -18000, -21600),
    (1615708800, -21600, -18000), (1636268400, -18000, -21600), (1647158400, -21600, -18000),
    (1667718000, -18000, -21600), (1678608000, -21600, -18000), (1699167600, -18000, -21600),
    (1710057600, -21600, -18000), (1730617200, -18000, -21600), (1741507200, -21600, -18000),
    (1762066800, -18000, -21600), (1772956800, -21600, -18000), (1793516400, -18000, -21600),
    (1805011200, -21600, -18000), (1825570800, -18000, -21600), (1836460800, -21600, -18000),
    (1857020400, -18000, -21600), (1867910400, -21600, -18000), (1888470000, -18000, -21600),
    (1899360000, -21600, -18000), (1919919600, -18000, -21600),
];

fn compile(source: &str) -> ZoneInfoCompiler {
    ZoneInfoCompiler::new(ZoneInfoData::from_zoneinfo_file(source).unwrap())
}

#[test]
fn summer_once_has_two_transitions() {
    let rules = compile(SUMMER_ONCE).build_zone("Test/Once").unwrap();
    assert_eq!(rules.wall_transitions.len(), 2);
    let [start, end] = [rules.wall_transitions[0], rules.wall_transitions[1]];
    assert!(start.epoch_seconds < end.epoch_seconds);
    assert_eq!((start.offset_before, start.offset_after), (3600, 7200));
    assert_eq!((end.offset_before, end.offset_after), (7200, 3600));
    // 2000-03-26T01:00Z
    assert_eq!(start.epoch_seconds, 954_032_400);
    assert!(rules.recurring_rules.is_empty());
    assert!(rules.standard_transitions.is_empty());
}

#[test]
fn chicago_history() {
    let rules = compile(CHICAGO).build_zone("America/Chicago").unwrap();
    assert_eq!(rules.initial_wall_offset, -21_036);

    let transitions: Vec<i64> = rules
        .wall_transitions
        .iter()
        .map(|t| t.epoch_seconds)
        .collect();
    // Railway time, then the first summer time of 1918.
    assert_eq!(&transitions[..3], &[-2_717_647_200, -1_633_276_800, -1_615_136_400]);
    for pair in transitions.windows(2) {
        assert!(pair[0] < pair[1]);
    }

    // 1936 EST window.
    assert_eq!(rules.offset_at(-1_050_000_000), -18_000);
    assert_eq!(rules.standard_offset_at(-1_050_000_000), -18_000);
    // 2025-07-01T00:00Z is CDT, 2025-01-15T00:00Z is CST.
    assert_eq!(rules.offset_at(1_751_328_000), -18_000);
    assert_eq!(rules.offset_at(1_736_899_200), -21_600);
    assert!(rules.is_daylight_savings(1_751_328_000));

    // 2025-03-09T08:00Z
    let start = rules.next_transition(1_736_899_200).unwrap();
    assert_eq!(start.epoch_seconds, 1_741_507_200);
    assert_eq!(rules.transitions_for_year(2025).len(), 2);
}

#[test]
fn chicago_every_transition() {
    let rules = compile(CHICAGO).build_zone("America/Chicago").unwrap();
    // 2031-01-01T00:00Z
    let end = 1_924_992_000;
    let mut transitions = Vec::new();
    let mut cursor = i64::MIN;
    while let Some(transition) = rules.next_transition(cursor) {
        if transition.epoch_seconds >= end {
            break;
        }
        transitions.push((
            transition.epoch_seconds,
            transition.offset_before,
            transition.offset_after,
        ));
        cursor = transition.epoch_seconds;
    }
    assert_eq!(transitions, CHICAGO_TRANSITIONS);

    for &(epoch_seconds, before, after) in &CHICAGO_TRANSITIONS {
        assert_eq!(rules.offset_at(epoch_seconds - 1), before, "{epoch_seconds}");
        assert_eq!(rules.offset_at(epoch_seconds), after, "{epoch_seconds}");
    }
}

#[test]
fn links_resolve_to_zone_rules() {
    let collection = compile(CHICAGO).build("test").unwrap();
    assert_eq!(
        collection.provided_zone_ids(),
        ["America/Chicago", "US/Central"]
    );
    assert_eq!(
        collection.get("US/Central"),
        collection.get("America/Chicago")
    );
}

#[test]
fn missing_rule_set() {
    let err = compile("Zone\tTest/Missing\t1:00\tNowhere\tT%sT\n")
        .build_zone("Test/Missing")
        .unwrap_err();
    assert_eq!(err, ZoneRulesError::UndefinedRuleSet("Nowhere".into()));
}

#[test]
fn malformed_line_reports_line_number() {
    let err = ZoneInfoData::from_zoneinfo_file("\n\nRule\tUS\t1918\tonly\t-\tSmarch\t1\t2:00\t1:00\tD\n")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "line 3: unknown value 'Smarch'"
    );
}

#[cfg(feature = "serde")]
#[test]
fn serialized_collection_round_trips() {
    let collection = compile(CHICAGO).build("2025b").unwrap();
    let json = serde_json::to_string(&collection).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["version"], "2025b");
    assert_eq!(value["links"]["US/Central"], "America/Chicago");
    let restored: zoneinfo_compiler::ZoneRulesCollection = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, collection);
}
