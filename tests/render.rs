use colorswatch::{
    render::{GimpPalette, Showcase},
    Document,
};

const SAMPLE: &[u8] = include_bytes!("fixtures/sample.cs");

#[test]
fn test_gimp_palette() {
    let doc = Document::from_slice(SAMPLE).unwrap();
    let actual = GimpPalette::new("sample").to_string(&doc);
    let expected = "GIMP Palette\n\
                    Name: sample\n\
                    Columns: 10\n\
                    #\n\
                    255 0 0\tRed\n\
                    255 0 0\tUntitled\n\
                    127 191 255\tSky\n\
                    \n";
    assert_eq!(actual, expected);
}

#[test]
fn test_gimp_palette_columns() {
    let doc = Document::from_slice(SAMPLE).unwrap();
    let actual = GimpPalette::new("x").columns(4).to_string(&doc);
    assert!(actual.starts_with("GIMP Palette\nName: x\nColumns: 4\n#\n"));
}

#[test]
fn test_showcase() {
    let doc = Document::from_slice(SAMPLE).unwrap();
    let actual = Showcase::new().to_string(&doc);

    assert!(actual.starts_with("<!DOCTYPE html>\n<html>\n<head>\n"));
    assert!(actual.ends_with("</body>\n</html>\n"));
    assert!(actual.contains("#cb0{background-color: rgb(255,0,0);}"));
    assert!(actual.contains("#cb2{background-color: rgb(127,191,255);}"));
    assert!(!actual.contains("#cb3"));

    let body = &actual[actual.find("<body>").unwrap()..];
    let expected = "<body>\n\
                    <h2 class=\"group\">Warm</h2>\n\
                    <span id=\"cb0\">Red</span>\n\
                    <span id=\"cb1\">rgb(255, 0, 0)</span>\n\
                    <span id=\"cb2\">Sky</span>\n\
                    </body>\n";
    assert!(body.starts_with(expected), "{}", body);
}

#[test]
fn test_showcase_escapes_names_and_untitled_groups() {
    let mut data = b"CS".to_vec();
    data.extend_from_slice(&[0x00, 0x00, 0x01, 0x00]);
    data.extend_from_slice(&[0; 12]);
    data.extend_from_slice(&[0x00, 0x02, 0x00]);
    data.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x00]);
    data.extend_from_slice(&[0x01, 0x00, 0x05, 0x00]);
    data.extend_from_slice(b"a<b>c");
    data.extend_from_slice(&[0x01, 0x00]);
    data.extend_from_slice(&[0; 12]);
    data.push(0x00);

    let doc = Document::from_slice(&data).unwrap();
    let actual = Showcase::new().compact(true).to_string(&doc);
    assert!(!actual.contains('\n'));
    assert!(actual.contains("<h2 class=\"group\">Untitled Group</h2>"));
    assert!(actual.contains("<span id=\"cb0\">a&lt;b&gt;c</span>"));
}

#[test]
fn test_showcase_data_url() {
    let doc = Document::from_slice(SAMPLE).unwrap();
    let showcase = Showcase::new();
    let url = showcase.to_data_url(&doc);

    let payload = url.strip_prefix("data:text/html;charset=UTF-8,").unwrap();
    assert!(!payload.contains(|c: char| c == ' ' || c == '<' || c == '\n' || c == '#'));

    let decoded = percent_encoding::percent_decode_str(payload)
        .decode_utf8()
        .unwrap();
    assert_eq!(decoded, showcase.compact(true).to_string(&doc));
}
