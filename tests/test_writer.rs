use courier::http::response::{Response, ResponseBuilder, StatusCode};
use courier::http::writer::{ResponseWriter, serialize_response};

#[test]
fn test_serialize_text_response() {
    let bytes = serialize_response(&Response::text("abc"));

    assert_eq!(
        bytes,
        b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\nContent-Type: text/plain\r\n\r\nabc".to_vec()
    );
}

#[test]
fn test_serialize_empty_not_found() {
    let bytes = serialize_response(&Response::not_found());

    assert_eq!(
        bytes,
        b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n".to_vec()
    );
}

#[test]
fn test_serialize_created() {
    let bytes = serialize_response(&Response::created());

    assert!(bytes.starts_with(b"HTTP/1.1 201 Created\r\n"));
    assert!(bytes.ends_with(b"\r\n\r\n"));
}

#[test]
fn test_serialize_body_is_not_transformed() {
    let body = b"line one\r\nline two\n\x00".to_vec();
    let response = ResponseBuilder::new(StatusCode::Ok).body(body.clone()).build();

    let bytes = serialize_response(&response);

    assert!(bytes.ends_with(&body));
    let head_end = bytes.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
    assert_eq!(&bytes[head_end + 4..], body.as_slice());
}

#[test]
fn test_serialize_is_deterministic() {
    let build = || {
        ResponseBuilder::new(StatusCode::Ok)
            .header("X-Zeta", "z")
            .header("X-Alpha", "a")
            .header("Content-Type", "text/plain")
            .body("hi")
            .build()
    };

    assert_eq!(serialize_response(&build()), serialize_response(&build()));
}

#[tokio::test]
async fn test_writer_writes_whole_buffer() {
    let response = Response::text("hello");
    let mut writer = ResponseWriter::new(&response);
    let expected = serialize_response(&response);

    let mut out: Vec<u8> = Vec::new();
    writer.write_to_stream(&mut out).await.unwrap();

    assert_eq!(out, expected);
}
