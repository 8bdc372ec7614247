use regsheet::{ipxact::Version, Cell, Config, Kind, Rank, Sheet, Workbook};

const REGISTER_HEADER: [&str; 9] =
    ["ADDR", "REG", "FIELD", "BIT", "WIDTH", "ATTRIBUTE", "DEFAULT", "DESCRIPTION", "STRIDE"];

fn vendor() -> Sheet {
    Sheet::new("version", ["VENDOR", "LIBRARY", "NAME", "VERSION", "DESCRIPTION"])
        .row(["acme", "periph", "timer", "1.0", "general purpose timer"])
}

fn address_map() -> Sheet {
    Sheet::new("address_map", ["BLOCK", "OFFSET", "RANGE", "DESCRIPTION"])
        .row(["ctrl", "0x4000", "0x100", "control registers"])
}

fn field_row(
    addr: &str,
    reg: &str,
    field: &str,
    bit: &str,
    width: i64,
    attribute: &str,
    default: &str,
) -> Vec<Cell> {
    vec![
        addr.into(),
        reg.into(),
        field.into(),
        bit.into(),
        Cell::Int(width),
        attribute.into(),
        default.into(),
        Cell::Empty,
        Cell::Empty,
    ]
}

fn ctrl() -> Sheet {
    Sheet::new("ctrl", REGISTER_HEADER)
        .row(field_row("0x0", "CTRL", "EN", "[0]", 1, "RW", "0x1"))
        .row(field_row("", "", "MODE", "[3:1]", 3, "RW", "0x5"))
        .row(field_row("", "", "rsvd", "[31:4]", 28, "RO", ""))
        .row(field_row("0x4", "STATUS", "DONE", "[0]", 1, "W1C", "0"))
        .row(field_row("", "", "BAD", "abc", 0, "RO", "0"))
        .row(field_row("0x10", "REGA{n}, n=range(3)", "VALUE", "[31:0]", 32, "RW", "0x0"))
}

fn workbook() -> Workbook {
    Workbook::new().sheet(vendor()).sheet(address_map()).sheet(ctrl())
}

#[test]
fn converts_whole_workbook() {
    let conversion = Config::new().convert(&workbook());
    let identity = conversion.component.as_ref().unwrap();
    assert_eq!(identity.name, "timer");
    assert_eq!(conversion.blocks.len(), 1);

    let registers = &conversion.blocks[0].registers;
    let names = registers.iter().map(|register| register.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["CTRL", "STATUS", "REGA_0", "REGA_1", "REGA_2"]);

    let ctrl = &registers[0];
    assert_eq!(ctrl.fields.len(), 2);
    assert_eq!(ctrl.reset, 0xB);
    assert_eq!(ctrl.stride, 4);

    let addresses = registers[2..].iter().map(|register| register.address).collect::<Vec<_>>();
    assert_eq!(addresses, [0x10, 0x14, 0x18]);
    assert!(registers[2..].iter().all(|register| register.stride == 4));
}

#[test]
fn bad_bit_range_drops_only_that_field() {
    let conversion = Config::new().convert(&workbook());
    let status = &conversion.blocks[0].registers[1];
    assert_eq!(status.name, "STATUS");
    assert_eq!(status.fields.len(), 1);
    assert_eq!(status.fields[0].name, "DONE");

    let errors = conversion
        .diagnostics
        .iter()
        .filter(|diagnostic| *diagnostic.rank() == Rank::Error)
        .collect::<Vec<_>>();
    assert_eq!(errors.len(), 1);
    assert_eq!(*errors[0].kind(), Kind::MalformedBitRange);
    assert!(conversion.has_errors());
}

#[test]
fn missing_range_column_empties_address_map() {
    let workbook = Workbook::new()
        .sheet(vendor())
        .sheet(Sheet::new("address_map", ["BLOCK", "OFFSET"]).row(["ctrl", "0x0"]))
        .sheet(ctrl());
    let conversion = Config::new().convert(&workbook);
    assert!(conversion.blocks.is_empty());
    let diagnostic = conversion.diagnostics.first().unwrap();
    assert_eq!(*diagnostic.kind(), Kind::MissingRequiredColumn);
    assert!(diagnostic.message().contains("RANGE"));
}

#[test]
fn missing_register_sheet_is_reported() {
    let workbook = Workbook::new().sheet(vendor()).sheet(address_map());
    let conversion = Config::new().convert(&workbook);
    assert_eq!(conversion.blocks.len(), 1);
    assert!(conversion.blocks[0].registers.is_empty());
    assert_eq!(*conversion.diagnostics[0].kind(), Kind::MissingSheet);
    assert_eq!(conversion.diagnostics[0].message(), "sheet 'ctrl' not found");
}

#[test]
fn custom_sheet_names() {
    let mut vendor = vendor();
    vendor.name = "ident".to_owned();
    let mut map = address_map();
    map.name = "blocks".to_owned();
    let workbook = Workbook::new().sheet(vendor).sheet(map).sheet(ctrl());
    let mut config = Config::new();
    config.vendor_sheet("ident").address_sheet("blocks");
    let conversion = config.convert(&workbook);
    assert!(conversion.component.is_some());
    assert_eq!(conversion.blocks[0].registers.len(), 5);
}

#[test]
fn blank_fields_reserved_drops_padding() {
    let sheet = Sheet::new("ctrl", REGISTER_HEADER)
        .row(field_row("0x0", "CH{n}, n=0~1", "EN", "[0]", 1, "RW", "0"))
        .row(field_row("", "", "", "[31:1]", 31, "", ""));
    let workbook = Workbook::new().sheet(vendor()).sheet(address_map()).sheet(sheet);

    let conversion = Config::new().convert(&workbook);
    let fields = &conversion.blocks[0].registers[0].fields;
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[1].name, "");

    let mut config = Config::new();
    config.blank_fields_reserved(true);
    let conversion = config.convert(&workbook);
    let registers = &conversion.blocks[0].registers;
    assert_eq!(registers.len(), 2);
    assert!(registers.iter().all(|register| register.fields.len() == 1));
}

#[test]
fn emits_2014_field_resets() {
    let xml = Config::new().convert(&workbook()).to_xml(Version::V2014).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<ipxact:component"));
    assert!(xml.contains("xmlns:ipxact=\"http://www.accellera.org/XMLSchema/IPXACT/1685-2014\""));
    assert!(xml.contains("<ipxact:name>REGA_2</ipxact:name>"));
    assert!(xml.contains("<ipxact:addressOffset>0x18</ipxact:addressOffset>"));
    assert!(xml.contains("<ipxact:value>0x1</ipxact:value>"));
    assert!(xml.contains("<ipxact:modifiedWriteValue>oneToClear</ipxact:modifiedWriteValue>"));
    assert!(xml.contains("<ipxact:width>32</ipxact:width>"));
    assert!(!xml.contains("fieldAccessPolicies"));
}

#[test]
fn emits_2009_register_reset() {
    let xml = Config::new().convert(&workbook()).to_xml(Version::V2009).unwrap();
    let namespace = "http://www.spiritconsortium.org/XMLSchema/SPIRIT/1685-2009";
    assert!(xml.contains(&format!("xmlns:spirit=\"{namespace}\"")));
    assert!(!xml.contains("ipxact"));
    assert!(!xml.contains("<spirit:resets>"));
    let ctrl = xml.find("<spirit:name>CTRL</spirit:name>").unwrap();
    let status = xml.find("<spirit:name>STATUS</spirit:name>").unwrap();
    let reset = xml[ctrl..status].find("<spirit:reset>").unwrap();
    assert!(xml[ctrl + reset..status].contains("<spirit:value>0xb</spirit:value>"));
    let memory_maps = xml.find("</spirit:memoryMaps>").unwrap();
    let description = xml.find("general purpose timer").unwrap();
    assert!(description > memory_maps);
}

#[test]
fn emits_2022_access_policies() {
    let xml = Config::new().convert(&workbook()).to_xml(Version::V2022).unwrap();
    assert!(xml.contains("IPXACT/1685-2022"));
    assert!(xml.contains("<ipxact:fieldAccessPolicies>"));
    assert!(xml.contains("<ipxact:resets>"));
    let policies = xml.find("<ipxact:fieldAccessPolicy>").unwrap();
    let access = xml.find("<ipxact:access>").unwrap();
    assert!(access > policies);
}

#[test]
fn oversized_stride_is_reported_not_emitted() {
    let mut row = field_row("0x8", "HUGE", "EN", "[0]", 1, "RW", "0");
    row[8] = Cell::Int(1 << 62);
    let sheet = Sheet::new("ctrl", REGISTER_HEADER)
        .row(field_row("0x4", "CTRL", "EN", "[0]", 1, "RW", "0"))
        .row(row);
    let workbook = Workbook::new().sheet(vendor()).sheet(address_map()).sheet(sheet);
    let conversion = Config::new().convert(&workbook);
    let registers = &conversion.blocks[0].registers;
    assert_eq!(registers.len(), 1);
    assert_eq!(registers[0].name, "CTRL");
    assert_eq!(*conversion.diagnostics[0].kind(), Kind::MalformedStride);
    assert!(conversion.to_xml(Version::V2014).unwrap().contains("<ipxact:size>8</ipxact:size>"));
}

#[test]
fn generate_writes_configured_version() {
    let path = std::env::temp_dir().join(format!("regsheet-{}.xml", std::process::id()));
    let mut config = Config::new();
    config.version(Version::V2022);
    let conversion = config.generate(&workbook(), &path).unwrap();
    let xml = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(xml, conversion.to_xml(Version::V2022).unwrap());
}
